//! Document parser backed by lopdf.
//!
//! Provides page counts and page geometry. It does not draw; pair it with a
//! [`PageRasterizer`](super::PageRasterizer) to produce pixels.

use lopdf::{Document, ObjectId};

use crate::config::Rotation;
use crate::error::{PdfPlanError, Result};
use crate::merge::pages::{media_box, page_rotation};
use crate::render::DocumentParser;
use crate::render::surface::Viewport;
use crate::validation::classify_load_error;

/// A parsed document and its pages in order.
#[derive(Debug)]
pub struct LopdfDocument {
    document: Document,
    pages: Vec<ObjectId>,
}

impl LopdfDocument {
    /// The underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// Geometry of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LopdfPage {
    /// Object id of the page dictionary.
    pub id: ObjectId,
    /// Unrotated width in points.
    pub width: f32,
    /// Unrotated height in points.
    pub height: f32,
    /// Rotation the page itself declares.
    pub rotate: Rotation,
}

/// Parser that reads documents with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfParser;

impl LopdfParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for LopdfParser {
    type Document = LopdfDocument;
    type Page = LopdfPage;

    fn load_document(&self, bytes: Vec<u8>) -> Result<LopdfDocument> {
        // Names are attached by the caller.
        let document = Document::load_mem(&bytes).map_err(|e| classify_load_error("", &e))?;
        if document.trailer.has(b"Encrypt") {
            return Err(PdfPlanError::encrypted_pdf(""));
        }

        let pages = document.get_pages().into_values().collect();
        Ok(LopdfDocument { document, pages })
    }

    fn page_count(&self, document: &LopdfDocument) -> usize {
        document.pages.len()
    }

    fn get_page(&self, document: &LopdfDocument, page_number: u32) -> Result<LopdfPage> {
        let id = page_number
            .checked_sub(1)
            .and_then(|index| document.pages.get(index as usize))
            .copied()
            .ok_or_else(|| PdfPlanError::PageOutOfRange {
                name: String::new(),
                page_index: page_number.saturating_sub(1),
                page_count: document.pages.len(),
            })?;

        let [x1, y1, x2, y2] = media_box(&document.document, id);
        Ok(LopdfPage {
            id,
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
            rotate: page_rotation(&document.document, id),
        })
    }

    fn viewport(&self, page: &LopdfPage, scale: f32, rotation: Rotation) -> Viewport {
        Viewport::new(page.width, page.height, scale, page.rotate.rotate_by(rotation))
    }
}
