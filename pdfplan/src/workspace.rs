//! The editing session.
//!
//! A [`Workspace`] owns everything one editing session knows: the imported
//! documents, the page plan with its selection, the preview zoom and the
//! last error shown to the user. It is mutated only through `&mut self`,
//! so every operation is applied whole.

use crate::config::{Rotation, WorkspaceConfig};
use crate::error::{PdfPlanError, Result};
use crate::import::{ImportedDocument, PreparedImport};
use crate::merge::{ExportedPdf, Exporter};
use crate::plan::{EntryId, PagePlan, PagePlanEntry, PlanEditor};
use crate::store::DocumentStore;

/// Session state of the editor.
#[derive(Debug, Clone)]
pub struct Workspace {
    config: WorkspaceConfig,
    store: DocumentStore,
    editor: PlanEditor,
    zoom: f32,
    last_error: Option<String>,
}

impl Workspace {
    /// Create an empty workspace with default settings.
    pub fn new() -> Self {
        Self::with_config(WorkspaceConfig::default())
    }

    /// Create an empty workspace.
    pub fn with_config(config: WorkspaceConfig) -> Self {
        Self {
            zoom: config.preview.default_zoom,
            config,
            store: DocumentStore::new(),
            editor: PlanEditor::new(),
            last_error: None,
        }
    }

    /// Session settings.
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Imported documents.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// The page plan.
    pub fn plan(&self) -> &PagePlan {
        self.editor.plan()
    }

    /// Selected entry id.
    pub fn selection(&self) -> Option<EntryId> {
        self.editor.selection()
    }

    /// Selected entry.
    pub fn selected_entry(&self) -> Option<&PagePlanEntry> {
        self.editor.selected_entry()
    }

    /// Position of the selected entry.
    pub fn selected_index(&self) -> Option<usize> {
        self.editor.selected_index()
    }

    /// Register a prepared import and append its pages to the plan.
    pub fn commit_import(&mut self, prepared: PreparedImport) -> ImportedDocument {
        let (name, bytes, page_count) = prepared.into_parts();
        let doc_id = self.store.register(name.clone(), bytes, page_count);
        let entry_ids = self.editor.append_document(doc_id, page_count);

        if page_count == 0 {
            log::warn!("{name} has no pages; nothing was added to the plan");
        }
        log::info!("Imported {name}: {page_count} page(s)");

        ImportedDocument {
            doc_id,
            name,
            page_count,
            entry_ids,
        }
    }

    /// Delete a plan entry, repairing the selection.
    pub fn delete_entry(&mut self, id: &EntryId) -> Option<PagePlanEntry> {
        self.editor.delete_entry(id)
    }

    /// Move `active` to the position held by `over`.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if either entry is unknown.
    pub fn move_entry(&mut self, active: &EntryId, over: &EntryId) -> Result<()> {
        self.editor.move_entry(active, over)
    }

    /// Move the entry at position `from` to position `to`.
    pub fn move_index(&mut self, from: usize, to: usize) -> bool {
        self.editor.move_index(from, to)
    }

    /// Rotate an entry clockwise.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry is unknown.
    pub fn rotate_entry(&mut self, id: &EntryId, rotation: Rotation) -> Result<Rotation> {
        self.editor.rotate_entry(id, rotation)
    }

    /// Select an entry.
    pub fn select(&mut self, id: &EntryId) -> bool {
        self.editor.select(id)
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.editor.clear_selection();
    }

    /// Select the next entry.
    pub fn select_next(&mut self) -> bool {
        self.editor.select_next()
    }

    /// Select the previous entry.
    pub fn select_previous(&mut self) -> bool {
        self.editor.select_previous()
    }

    /// Current preview zoom.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Zoom as a rounded percentage, for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Zoom in by one step, up to the maximum.
    pub fn zoom_in(&mut self) -> f32 {
        self.set_zoom(self.zoom + self.config.preview.zoom_step)
    }

    /// Zoom out by one step, down to the minimum.
    pub fn zoom_out(&mut self) -> f32 {
        self.set_zoom(self.zoom - self.config.preview.zoom_step)
    }

    /// Set the zoom, clamped to the configured bounds. Returns the new zoom.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        let preview = &self.config.preview;
        if zoom.is_finite() {
            self.zoom = zoom.clamp(preview.min_zoom, preview.max_zoom);
        }
        self.zoom
    }

    /// Check whether there is anything to export.
    pub fn can_export(&self) -> bool {
        !self.plan().is_empty()
    }

    /// Export the plan with the configured options.
    ///
    /// On failure the error is also recorded as the workspace error.
    ///
    /// # Errors
    ///
    /// Returns any error raised by [`Exporter::export`].
    pub async fn export(&mut self) -> Result<ExportedPdf> {
        let exporter = Exporter::with_options(self.config.export.clone());
        let result = exporter.export(self.editor.plan(), &self.store).await;

        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                log::warn!("Export failed: {e}");
                self.record_error(e);
            }
        }
        result
    }

    /// The last error shown to the user.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Record an error as the one shown to the user.
    pub fn record_error(&mut self, error: &PdfPlanError) {
        self.last_error = Some(error.user_message());
    }

    /// Dismiss the error shown to the user.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
