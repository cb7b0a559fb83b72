//! Building the exported PDF.
//!
//! This module provides the export side of the editor with:
//! - Deep copies of individual source pages
//! - Flattening of inherited page attributes
//! - Rotation of copied pages
//! - Output metadata
//! - Order preservation
//!
//! # Examples
//!
//! ```no_run
//! use pdfplan::merge::export_plan;
//! use pdfplan::Workspace;
//! use std::path::Path;
//!
//! # async fn example(workspace: &Workspace) -> Result<(), Box<dyn std::error::Error>> {
//! let exported = export_plan(workspace.plan(), workspace.store()).await?;
//! exported.save(Path::new(&exported.suggested_file_name)).await?;
//! println!("Exported {} pages", exported.page_count);
//! # Ok(())
//! # }
//! ```

pub mod exporter;
pub mod metadata;
pub mod pages;

pub use exporter::{ExportStatistics, ExportedPdf, Exporter, PDF_MEDIA_TYPE};
pub use pages::{LoadedSource, OutputDocument};

use crate::error::Result;
use crate::plan::PagePlan;
use crate::store::DocumentStore;

/// Export a plan with default options.
///
/// # Errors
///
/// Returns an error if the plan is empty or any page cannot be copied.
pub async fn export_plan(plan: &PagePlan, store: &DocumentStore) -> Result<ExportedPdf> {
    Exporter::new().export(plan, store).await
}
