//! Export of a page plan into a single PDF.
//!
//! The exporter walks the plan in order. Each source document is parsed at
//! most once per export, on the first entry that refers to it, and every
//! entry contributes exactly one output page. Output page `k` is a copy of
//! the page referenced by plan entry `k`.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::config::ExportOptions;
use crate::error::{PdfPlanError, Result};
use crate::io::writer::{FileWriter, WriteStatistics};
use crate::merge::metadata::info_dictionary;
use crate::merge::pages::{LoadedSource, OutputDocument};
use crate::plan::{PagePlan, PagePlanEntry};
use crate::store::{DocumentId, DocumentStore, SourceDocument};
use crate::utils::{export_file_name, format_file_size};

/// Media type of exported documents.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPdf {
    /// Serialized PDF.
    pub bytes: Vec<u8>,

    /// Number of pages in the output.
    pub page_count: usize,

    /// Always `application/pdf`.
    pub media_type: &'static str,

    /// `merged-YYYY-MM-DD.pdf`, dated at export time (UTC).
    pub suggested_file_name: String,
}

impl ExportedPdf {
    /// Size of the serialized document in bytes.
    pub fn byte_length(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Write the document to `path`, replacing any existing file atomically.
    ///
    /// # Errors
    ///
    /// Returns `FailedToWrite` if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<WriteStatistics> {
        FileWriter::new().write(path, self.bytes.clone()).await
    }
}

/// Statistics about one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportStatistics {
    /// Pages written.
    pub page_count: usize,
    /// Distinct source documents parsed.
    pub sources_loaded: usize,
    /// Size of the output in bytes.
    pub output_size: usize,
    /// Time spent assembling and serializing.
    pub assembly_time: Duration,
}

/// Turns page plans into PDF documents.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    /// Create an exporter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an exporter with custom options.
    pub fn with_options(options: ExportOptions) -> Self {
        Self { options }
    }

    /// The options applied to every export.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export `plan` using the documents in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The plan is empty (checked before anything else is done)
    /// - An entry refers to a document missing from the store
    /// - An entry's page index is past the end of its document
    /// - A stored document can no longer be parsed
    /// - The output cannot be serialized
    ///
    /// No partial output is produced on error.
    pub async fn export(&self, plan: &PagePlan, store: &DocumentStore) -> Result<ExportedPdf> {
        if plan.is_empty() {
            return Err(PdfPlanError::EmptyPlan);
        }

        let sources = resolve_sources(plan, store)?;
        let entries = plan.entries().to_vec();
        let options = self.options.clone();
        let created = Utc::now();

        log::debug!(
            "Exporting {} page(s) from {} document(s)",
            entries.len(),
            sources.len()
        );

        let (bytes, stats) =
            task::spawn_blocking(move || assemble(&entries, &sources, &options, created))
                .await
                .map_err(|e| PdfPlanError::export_failed(format!("Export task failed: {e}")))??;

        log::info!(
            "Exported {} page(s) ({}) in {:?}",
            stats.page_count,
            format_file_size(stats.output_size as u64),
            stats.assembly_time
        );

        Ok(ExportedPdf {
            bytes,
            page_count: stats.page_count,
            media_type: PDF_MEDIA_TYPE,
            suggested_file_name: export_file_name(created.date_naive()),
        })
    }
}

/// Look up every document the plan refers to, failing on the first dangling id.
fn resolve_sources(
    plan: &PagePlan,
    store: &DocumentStore,
) -> Result<HashMap<DocumentId, Arc<SourceDocument>>> {
    let mut sources = HashMap::new();
    for entry in plan {
        if sources.contains_key(&entry.doc_id) {
            continue;
        }
        let source = store
            .get_shared(&entry.doc_id)
            .ok_or_else(|| PdfPlanError::missing_document(entry.doc_id))?;
        sources.insert(entry.doc_id, source);
    }
    Ok(sources)
}

/// Build and serialize the output document.
pub fn assemble(
    entries: &[PagePlanEntry],
    sources: &HashMap<DocumentId, Arc<SourceDocument>>,
    options: &ExportOptions,
    created: DateTime<Utc>,
) -> Result<(Vec<u8>, ExportStatistics)> {
    let start = Instant::now();
    let mut output = OutputDocument::new();
    let mut cache: HashMap<DocumentId, LoadedSource> = HashMap::new();

    for entry in entries {
        let loaded = match cache.entry(entry.doc_id) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                let source = sources
                    .get(&entry.doc_id)
                    .ok_or_else(|| PdfPlanError::missing_document(entry.doc_id))?;
                log::debug!("Parsing {} for export", source.name);
                slot.insert(LoadedSource::load(&source.name, source.bytes())?)
            }
        };

        let page_id = output.copy_page(loaded, entry.page_index)?;
        if options.apply_rotation {
            output.rotate_page(page_id, entry.rotation)?;
        }
        output.add_page(page_id);
    }

    let page_count = output.page_count();
    output.set_info(info_dictionary(&options.metadata, created));
    let bytes = output.save(options.compress)?;

    let stats = ExportStatistics {
        page_count,
        sources_loaded: cache.len(),
        output_size: bytes.len(),
        assembly_time: start.elapsed(),
    };
    Ok((bytes, stats))
}
