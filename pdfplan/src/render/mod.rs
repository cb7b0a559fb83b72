//! Page previews and thumbnails.
//!
//! Rendering is split across two collaborators:
//! - A [`DocumentParser`] opens documents and reports page geometry
//! - A [`PageRasterizer`] draws a page into a [`RasterSurface`]
//!
//! [`PreviewRenderer`] drives them for one plan entry at a time. Every
//! render parses a fresh document from a copy of the stored bytes, so no
//! parsed handle is ever shared between renders. Rendering reads the
//! workspace and never changes it.
//!
//! # Examples
//!
//! ```no_run
//! use pdfplan::render::{PageRasterizer, PreviewRenderer};
//! use pdfplan::Workspace;
//!
//! # async fn example<R: PageRasterizer>(rasterizer: R, workspace: &Workspace) {
//! let renderer = PreviewRenderer::from_config(rasterizer, &workspace.config().preview);
//! for (entry_id, thumbnail) in renderer.render_thumbnails(workspace).await {
//!     if let Ok(page) = thumbnail {
//!         println!("{entry_id}: {}x{}", page.css_width, page.css_height);
//!     }
//! }
//! # }
//! ```

pub mod parser;
pub mod surface;

pub use parser::{LopdfDocument, LopdfPage, LopdfParser};
pub use surface::{RasterSurface, Viewport};

use std::sync::Arc;
use tokio::task;

use crate::config::{PreviewConfig, Rotation};
use crate::error::{PdfPlanError, Result};
use crate::plan::{EntryId, PagePlan};
use crate::store::DocumentStore;
use crate::workspace::Workspace;

/// Opens documents and describes their pages.
pub trait DocumentParser: Send + Sync + 'static {
    /// A parsed document.
    type Document: Send + 'static;

    /// One page of a parsed document.
    type Page: Send + 'static;

    /// Parse a complete document, taking ownership of its bytes.
    fn load_document(&self, bytes: Vec<u8>) -> Result<Self::Document>;

    /// Number of pages in a parsed document.
    fn page_count(&self, document: &Self::Document) -> usize;

    /// Fetch a page by its one-based page number.
    fn get_page(&self, document: &Self::Document, page_number: u32) -> Result<Self::Page>;

    /// Size of a page at `scale`, with `rotation` added to the page's own.
    fn viewport(&self, page: &Self::Page, scale: f32, rotation: Rotation) -> Viewport;
}

/// Draws pages into raster surfaces.
pub trait PageRasterizer: DocumentParser {
    /// Draw `page` into `surface`, which is sized for `viewport`.
    fn render(
        &self,
        page: &Self::Page,
        viewport: &Viewport,
        surface: &mut RasterSurface,
    ) -> Result<()>;
}

/// A drawn page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Plan entry that was rendered.
    pub entry_id: EntryId,
    /// One-based page number in the source document.
    pub page_number: u32,
    /// Pixels, sized in device pixels.
    pub surface: RasterSurface,
    /// Display width in CSS pixels.
    pub css_width: u32,
    /// Display height in CSS pixels.
    pub css_height: u32,
}

/// Renders plan entries through a rasterizer.
pub struct PreviewRenderer<R> {
    rasterizer: Arc<R>,
    device_pixel_ratio: f32,
}

impl<R: PageRasterizer> PreviewRenderer<R> {
    /// Create a renderer for a display with the given device pixel ratio.
    pub fn new(rasterizer: R, device_pixel_ratio: f32) -> Self {
        Self {
            rasterizer: Arc::new(rasterizer),
            device_pixel_ratio,
        }
    }

    /// Create a renderer using the preview settings of a configuration.
    pub fn from_config(rasterizer: R, config: &PreviewConfig) -> Self {
        Self::new(rasterizer, config.device_pixel_ratio)
    }

    /// Device pixel ratio surfaces are sized for.
    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// Render one plan entry at `scale`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry or its document is unknown, the page
    /// does not exist, the document cannot be parsed, no surface of the
    /// needed size can be acquired, or drawing fails.
    pub async fn render_entry(
        &self,
        store: &DocumentStore,
        plan: &PagePlan,
        entry_id: &EntryId,
        scale: f32,
    ) -> Result<RenderedPage> {
        let entry = *plan
            .get(entry_id)
            .ok_or_else(|| PdfPlanError::entry_not_found(*entry_id))?;
        let source = store
            .get(&entry.doc_id)
            .ok_or_else(|| PdfPlanError::missing_document(entry.doc_id))?;

        if entry.page_index as usize >= source.page_count {
            return Err(PdfPlanError::PageOutOfRange {
                name: source.name.clone(),
                page_index: entry.page_index,
                page_count: source.page_count,
            });
        }

        let name = source.name.clone();
        let bytes = source.bytes().to_vec();
        let rasterizer = Arc::clone(&self.rasterizer);
        let device_pixel_ratio = self.device_pixel_ratio;

        task::spawn_blocking(move || {
            let document = rasterizer
                .load_document(bytes)
                .map_err(|e| e.for_file(&name))?;
            let page = rasterizer.get_page(&document, entry.page_number())?;
            let viewport = rasterizer.viewport(&page, scale, entry.rotation);

            let (width, height) = viewport.device_size(device_pixel_ratio);
            let mut surface = RasterSurface::new(width, height)?;
            rasterizer.render(&page, &viewport, &mut surface)?;

            let (css_width, css_height) = viewport.css_size();
            Ok(RenderedPage {
                entry_id: entry.id,
                page_number: entry.page_number(),
                surface,
                css_width,
                css_height,
            })
        })
        .await
        .map_err(|e| PdfPlanError::render_failed(format!("Render task failed: {e}")))?
    }

    /// Render the selected entry at the workspace zoom.
    ///
    /// Returns `Ok(None)` when nothing is selected.
    pub async fn render_selected(&self, workspace: &Workspace) -> Result<Option<RenderedPage>> {
        let Some(entry_id) = workspace.selection() else {
            return Ok(None);
        };

        self.render_entry(
            workspace.store(),
            workspace.plan(),
            &entry_id,
            workspace.zoom(),
        )
        .await
        .map(Some)
    }

    /// Render a thumbnail of every plan entry, in plan order.
    ///
    /// A failing thumbnail is logged and reported in its slot; the others
    /// are still rendered.
    pub async fn render_thumbnails(
        &self,
        workspace: &Workspace,
    ) -> Vec<(EntryId, Result<RenderedPage>)> {
        let scale = workspace.config().preview.thumbnail_scale;
        let mut thumbnails = Vec::with_capacity(workspace.plan().len());

        for entry in workspace.plan() {
            let result = self
                .render_entry(workspace.store(), workspace.plan(), &entry.id, scale)
                .await;
            if let Err(e) = &result {
                log::warn!("Thumbnail for entry {} failed: {e}", entry.id);
            }
            thumbnails.push((entry.id, result));
        }

        thumbnails
    }
}
