//! Shared helpers for the pdfplan integration tests.
//!
//! Fixtures are generated in memory with lopdf, so every test states the
//! exact page sizes it depends on.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};
use pdfplan::config::Rotation;
use pdfplan::io::ImportSource;
use pdfplan::render::{
    DocumentParser, LopdfDocument, LopdfPage, LopdfParser, PageRasterizer, RasterSurface,
    Viewport,
};
use pdfplan::{EntryId, Importer, ImportedDocument, Result, Workspace};

/// Build a PDF with one page per `(width, height)`.
///
/// Page `n` carries a content stream reading `Page n`, so pages of equal
/// size can still be told apart.
pub fn build_pdf(sizes: &[(f32, f32)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for (i, &(width, height)) in sizes.iter().enumerate() {
        let content = format!("BT /F1 18 Tf 20 20 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => sizes.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize fixture");
    bytes
}

/// An in-memory import source.
pub fn pdf_source(name: &str, sizes: &[(f32, f32)]) -> ImportSource {
    ImportSource::from_bytes(name, build_pdf(sizes))
}

/// A `count`-page letter-size source.
pub fn letter_source(name: &str, count: usize) -> ImportSource {
    pdf_source(name, &vec![(612.0, 792.0); count])
}

/// Import `source` into `workspace`, panicking on failure.
pub async fn import(workspace: &mut Workspace, source: ImportSource) -> ImportedDocument {
    Importer::from_config(workspace.config())
        .import(workspace, source)
        .await
        .expect("Import failed")
}

/// Entry ids of the plan in order.
pub fn plan_ids(workspace: &Workspace) -> Vec<EntryId> {
    workspace.plan().iter().map(|e| e.id).collect()
}

/// A page of an exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPage {
    pub width: f32,
    pub height: f32,
    pub rotate: i64,
    pub content: Vec<u8>,
}

/// Parse exported bytes back into page descriptions.
pub fn read_output(bytes: &[u8]) -> Vec<OutputPage> {
    let doc = Document::load_mem(bytes).expect("Exported document does not parse");
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_dictionary(id).expect("Page is not a dictionary");
            let media_box: Vec<f32> = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("Copied page has no MediaBox")
                .iter()
                .map(|v| v.as_float().expect("MediaBox value is not a number"))
                .collect();
            let rotate = page.get(b"Rotate").and_then(Object::as_i64).unwrap_or(0);

            OutputPage {
                width: media_box[2] - media_box[0],
                height: media_box[3] - media_box[1],
                rotate,
                content: doc.get_page_content(id).expect("Page content unreadable"),
            }
        })
        .collect()
}

/// Create a temporary output path for test results.
pub fn temp_output_path() -> tempfile::TempPath {
    tempfile::NamedTempFile::new()
        .expect("Failed to create temp file")
        .into_temp_path()
}

/// Rasterizer that paints every page a single color.
pub struct SolidRasterizer(pub [u8; 4]);

impl DocumentParser for SolidRasterizer {
    type Document = LopdfDocument;
    type Page = LopdfPage;

    fn load_document(&self, bytes: Vec<u8>) -> Result<LopdfDocument> {
        LopdfParser.load_document(bytes)
    }

    fn page_count(&self, document: &LopdfDocument) -> usize {
        LopdfParser.page_count(document)
    }

    fn get_page(&self, document: &LopdfDocument, page_number: u32) -> Result<LopdfPage> {
        LopdfParser.get_page(document, page_number)
    }

    fn viewport(&self, page: &LopdfPage, scale: f32, rotation: Rotation) -> Viewport {
        LopdfParser.viewport(page, scale, rotation)
    }
}

impl PageRasterizer for SolidRasterizer {
    fn render(&self, _: &LopdfPage, _: &Viewport, surface: &mut RasterSurface) -> Result<()> {
        surface.fill(self.0);
        Ok(())
    }
}
