//! Importing PDF files into a workspace.
//!
//! An import runs in two phases:
//! 1. [`Importer::prepare`] validates, reads and parses the file. It never
//!    touches the workspace, so any number of prepares may run at once.
//! 2. [`Workspace::commit_import`] registers the document and appends its
//!    pages in one `&mut` call.
//!
//! A failed prepare leaves the workspace exactly as it was. The size and
//! type checks run before the file is read, and the parser only ever sees
//! files that passed them.
//!
//! # Examples
//!
//! ```no_run
//! use pdfplan::import::Importer;
//! use pdfplan::io::ImportSource;
//! use pdfplan::Workspace;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut workspace = Workspace::new();
//! let importer = Importer::from_config(workspace.config());
//!
//! let imported = importer
//!     .import(&mut workspace, ImportSource::from_path("report.pdf"))
//!     .await?;
//! println!("{} added {} pages", imported.name, imported.page_count);
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::config::WorkspaceConfig;
use crate::error::{PdfPlanError, Result};
use crate::io::reader::{ImportSource, SourceReader};
use crate::plan::EntryId;
use crate::render::{DocumentParser, LopdfParser};
use crate::store::DocumentId;
use crate::validation::Validator;
use crate::workspace::Workspace;

/// A parsed file, ready to be committed to a workspace.
pub struct PreparedImport {
    /// Original file name.
    pub name: String,

    /// Page count reported by the parser.
    pub page_count: usize,

    /// Time spent reading and parsing.
    pub prepare_time: Duration,

    bytes: Vec<u8>,
}

impl PreparedImport {
    /// Size of the file in bytes.
    pub fn byte_length(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub(crate) fn into_parts(self) -> (String, Vec<u8>, usize) {
        (self.name, self.bytes, self.page_count)
    }
}

impl fmt::Debug for PreparedImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedImport")
            .field("name", &self.name)
            .field("page_count", &self.page_count)
            .field("byte_length", &self.bytes.len())
            .finish()
    }
}

/// What a committed import added to the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDocument {
    /// Identifier of the new document.
    pub doc_id: DocumentId,

    /// Original file name.
    pub name: String,

    /// Pages in the document.
    pub page_count: usize,

    /// The appended plan entries, in page order.
    pub entry_ids: Vec<EntryId>,
}

/// Validates, reads and parses files for import.
pub struct Importer<P = LopdfParser> {
    reader: SourceReader,
    parser: Arc<P>,
    workers: usize,
}

impl Importer<LopdfParser> {
    /// Create an importer using the lopdf parser.
    pub fn new(validator: Validator) -> Self {
        Self::with_parser(validator, LopdfParser::new())
    }

    /// Create an importer from workspace settings.
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self::new(Validator::new(config.max_file_size)).with_workers(config.import_workers)
    }
}

impl Default for Importer<LopdfParser> {
    fn default() -> Self {
        Self::new(Validator::default())
    }
}

impl<P: DocumentParser> Importer<P> {
    /// Create an importer using a custom parser.
    pub fn with_parser(validator: Validator, parser: P) -> Self {
        Self {
            reader: SourceReader::new(validator),
            parser: Arc::new(parser),
            workers: 1,
        }
    }

    /// Set how many files [`import_all`](Self::import_all) parses at once.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Validate, read and parse a file without touching any workspace.
    ///
    /// The parser receives its own copy of the bytes; the copy kept for the
    /// document store is never handed to it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is not a `.pdf` file
    /// - The file exceeds the size ceiling (the parser is not called)
    /// - The file cannot be read
    /// - The content is not a readable, unprotected PDF
    pub async fn prepare(&self, source: ImportSource) -> Result<PreparedImport> {
        let start = Instant::now();
        let file = self.reader.read(source).await?;

        let parser = Arc::clone(&self.parser);
        let parser_bytes = file.bytes.clone();
        let page_count = task::spawn_blocking(move || {
            let document = parser.load_document(parser_bytes)?;
            let page_count = parser.page_count(&document);
            // Page indices are u32 throughout the plan.
            if u32::try_from(page_count).is_err() {
                return Err(PdfPlanError::parse_failure(
                    "",
                    format!("Too many pages: {page_count}"),
                ));
            }
            Ok(page_count)
        })
        .await
        // A panicking parser is a load failure of this file.
        .map_err(|e| PdfPlanError::parse_failure(&file.name, format!("Parser aborted: {e}")))?
        .map_err(|e| e.for_file(&file.name))?;

        Ok(PreparedImport {
            name: file.name,
            page_count,
            prepare_time: start.elapsed(),
            bytes: file.bytes,
        })
    }

    /// Import one file into `workspace`.
    ///
    /// Clears the workspace error first; on failure the error is recorded
    /// there and the store and plan are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error from [`prepare`](Self::prepare).
    pub async fn import(
        &self,
        workspace: &mut Workspace,
        source: ImportSource,
    ) -> Result<ImportedDocument> {
        workspace.clear_error();
        let name = source.name();

        match self.prepare(source).await {
            Ok(prepared) => Ok(workspace.commit_import(prepared)),
            Err(e) => {
                log::warn!("Import of {name} failed: {e}");
                workspace.record_error(&e);
                Err(e)
            }
        }
    }

    /// Import several files, parsing them concurrently.
    ///
    /// Each file is committed as soon as it has been parsed, so documents
    /// land in the plan in completion order; the pages of each stay
    /// contiguous and ordered. Results are returned in the order of
    /// `sources`.
    pub async fn import_all(
        &self,
        workspace: &mut Workspace,
        sources: Vec<ImportSource>,
    ) -> Vec<Result<ImportedDocument>> {
        workspace.clear_error();

        let mut results: Vec<Option<Result<ImportedDocument>>> =
            std::iter::repeat_with(|| None).take(sources.len()).collect();

        let tasks = sources.into_iter().enumerate().map(|(index, source)| {
            let name = source.name();
            async move { (index, name, self.prepare(source).await) }
        });
        let mut pending = stream::iter(tasks).buffer_unordered(self.workers);

        while let Some((index, name, outcome)) = pending.next().await {
            let result = match outcome {
                Ok(prepared) => Ok(workspace.commit_import(prepared)),
                Err(e) => {
                    log::warn!("Import of {name} failed: {e}");
                    workspace.record_error(&e);
                    Err(e)
                }
            };
            results[index] = Some(result);
        }

        results.into_iter().flatten().collect()
    }
}
