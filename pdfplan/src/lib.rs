//! pdfplan - Assemble a new PDF from the pages of imported ones.
//!
//! This library is the engine of a page-plan editor. Documents are imported
//! into a [`Workspace`], every page becomes an entry of the page plan, and
//! the plan is edited (pages deleted, reordered, rotated) before being
//! exported as a single PDF. It supports:
//!
//! - Validated imports with a size ceiling, singly or concurrently
//! - Plan editing with selection tracking
//! - Export with page deep-copies, rotation and metadata
//! - Preview and thumbnail rendering through a pluggable rasterizer
//! - Comprehensive error handling
//!
//! Source documents are kept as raw bytes for the whole session and parsed
//! again by whatever needs them; parsed handles are never shared.
//!
//! # Examples
//!
//! ## Import, edit, export
//!
//! ```no_run
//! use pdfplan::io::ImportSource;
//! use pdfplan::{Importer, Workspace};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut workspace = Workspace::new();
//! let importer = Importer::from_config(workspace.config());
//!
//! let a = importer.import(&mut workspace, ImportSource::from_path("a.pdf")).await?;
//! let b = importer.import(&mut workspace, ImportSource::from_path("b.pdf")).await?;
//!
//! // Put the first page of b in front and drop the last page of a.
//! workspace.move_entry(&b.entry_ids[0], &a.entry_ids[0])?;
//! if let Some(last) = a.entry_ids.last() {
//!     workspace.delete_entry(last);
//! }
//!
//! let exported = workspace.export().await?;
//! exported.save(Path::new(&exported.suggested_file_name)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use pdfplan::merge::export_plan;
//! use pdfplan::plan::PagePlan;
//! use pdfplan::store::DocumentStore;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = DocumentStore::new();
//! let doc_id = store.register("scan.pdf", bytes, 3);
//!
//! let mut plan = PagePlan::new();
//! plan.append_document(doc_id, 3);
//! plan.move_index(2, 0);
//!
//! let exported = export_plan(&plan, &store).await?;
//! println!("{} pages, {} bytes", exported.page_count, exported.bytes.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod import;
pub mod io;
pub mod merge;
pub mod plan;
pub mod render;
pub mod store;
pub mod utils;
pub mod validation;
pub mod workspace;

// Re-export commonly used types
pub use config::{Rotation, WorkspaceConfig};
pub use error::{PdfPlanError, Result};
pub use import::{ImportedDocument, Importer};
pub use merge::{ExportedPdf, Exporter};
pub use plan::{EntryId, PagePlan, PagePlanEntry, PlanEditor};
pub use store::{DocumentId, DocumentStore, SourceDocument};
pub use workspace::Workspace;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
