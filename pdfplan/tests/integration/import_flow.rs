//! Integration tests for importing documents.

use pdfplan::error::LOAD_FAILED_MESSAGE;
use pdfplan::io::ImportSource;
use pdfplan::render::{DocumentParser, LopdfParser, Viewport};
use pdfplan::validation::Validator;
use pdfplan::{DocumentId, Importer, PdfPlanError, Result, Rotation, Workspace};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use crate::common::{build_pdf, import, letter_source, pdf_source, plan_ids};

#[tokio::test]
async fn test_import_appends_pages_after_existing_plan() {
    let mut workspace = Workspace::new();
    import(&mut workspace, letter_source("first.pdf", 2)).await;
    let before = plan_ids(&workspace);

    let second = import(&mut workspace, letter_source("second.pdf", 4)).await;

    let plan = workspace.plan();
    assert_eq!(plan.len(), 6);
    assert_eq!(&plan_ids(&workspace)[..2], before.as_slice());

    let appended: Vec<(DocumentId, u32, Rotation)> = plan.entries()[2..]
        .iter()
        .map(|e| (e.doc_id, e.page_index, e.rotation))
        .collect();
    let expected: Vec<(DocumentId, u32, Rotation)> = (0..4)
        .map(|i| (second.doc_id, i, Rotation::None))
        .collect();
    assert_eq!(appended, expected);
    assert_eq!(second.entry_ids, plan_ids(&workspace)[2..]);
}

#[tokio::test]
async fn test_import_registers_document_bytes() {
    let mut workspace = Workspace::new();
    let bytes = build_pdf(&[(300.0, 300.0), (300.0, 300.0)]);

    let imported = import(
        &mut workspace,
        ImportSource::from_bytes("kept.pdf", bytes.clone()),
    )
    .await;

    let document = workspace.store().get(&imported.doc_id).unwrap();
    assert_eq!(document.name, "kept.pdf");
    assert_eq!(document.page_count, 2);
    assert_eq!(document.bytes(), bytes.as_slice());
    assert_eq!(document.byte_length(), bytes.len() as u64);
}

#[tokio::test]
async fn test_same_file_twice_gets_two_documents() {
    let mut workspace = Workspace::new();
    let a = import(&mut workspace, letter_source("same.pdf", 1)).await;
    let b = import(&mut workspace, letter_source("same.pdf", 1)).await;

    assert_ne!(a.doc_id, b.doc_id);
    assert_ne!(a.entry_ids, b.entry_ids);
    assert_eq!(workspace.store().len(), 2);
}

#[tokio::test]
async fn test_import_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Scanned.PDF");
    std::fs::write(&path, build_pdf(&[(200.0, 100.0)])).unwrap();

    let mut workspace = Workspace::new();
    let imported = import(&mut workspace, ImportSource::from_path(&path)).await;

    assert_eq!(imported.name, "Scanned.PDF");
    assert_eq!(imported.page_count, 1);
}

/// Parser that records every call before delegating to lopdf.
#[derive(Clone, Default)]
struct RecordingParser {
    loads: Arc<AtomicUsize>,
}

impl DocumentParser for RecordingParser {
    type Document = usize;
    type Page = ();

    fn load_document(&self, bytes: Vec<u8>) -> Result<usize> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let document = LopdfParser.load_document(bytes)?;
        Ok(LopdfParser.page_count(&document))
    }

    fn page_count(&self, document: &usize) -> usize {
        *document
    }

    fn get_page(&self, _: &usize, _: u32) -> Result<()> {
        Ok(())
    }

    fn viewport(&self, _: &(), scale: f32, rotation: Rotation) -> Viewport {
        Viewport::new(612.0, 792.0, scale, rotation)
    }
}

#[tokio::test]
async fn test_oversized_upload_is_rejected_before_parsing() {
    let parser = RecordingParser::default();
    let importer = Importer::with_parser(Validator::default(), parser.clone());
    let mut workspace = Workspace::new();
    import(&mut workspace, letter_source("small.pdf", 1)).await;
    let plan_before = workspace.plan().clone();

    let oversized = vec![b'%'; 52_428_801];
    let err = importer
        .import(&mut workspace, ImportSource::from_bytes("huge.pdf", oversized))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfPlanError::SizeLimitExceeded { .. }));
    assert_eq!(parser.loads.load(Ordering::SeqCst), 0);
    assert_eq!(workspace.plan(), &plan_before);
    assert_eq!(workspace.store().len(), 1);
    assert_eq!(
        workspace.last_error(),
        Some("File size exceeds 50MB limit: huge.pdf")
    );
}

#[tokio::test]
async fn test_oversized_file_on_disk_is_rejected_before_reading() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.pdf");
    let file = std::fs::File::create(&path).unwrap();
    file.set_len(52_428_801).unwrap();

    let parser = RecordingParser::default();
    let importer = Importer::with_parser(Validator::default(), parser.clone());
    let mut workspace = Workspace::new();

    let result = importer
        .import(&mut workspace, ImportSource::from_path(&path))
        .await;

    assert!(matches!(
        result,
        Err(PdfPlanError::SizeLimitExceeded { size: 52_428_801, .. })
    ));
    assert_eq!(parser.loads.load(Ordering::SeqCst), 0);
    assert!(workspace.store().is_empty());
}

#[tokio::test]
async fn test_file_at_ceiling_reaches_parser() {
    let parser = RecordingParser::default();
    let bytes = build_pdf(&[(100.0, 100.0)]);
    let importer = Importer::with_parser(Validator::new(bytes.len() as u64), parser.clone());
    let mut workspace = Workspace::new();

    importer
        .import(&mut workspace, ImportSource::from_bytes("exact.pdf", bytes))
        .await
        .unwrap();
    assert_eq!(parser.loads.load(Ordering::SeqCst), 1);
    assert_eq!(workspace.plan().len(), 1);
}

#[tokio::test]
async fn test_import_all_mixed_results() {
    let mut workspace = Workspace::new();
    let importer = Importer::from_config(workspace.config());

    let results = importer
        .import_all(
            &mut workspace,
            vec![
                letter_source("one.pdf", 1),
                pdf_source("two.pdf", &[(100.0, 100.0), (200.0, 200.0)]),
                ImportSource::from_bytes("three.pdf", b"not a pdf at all".to_vec()),
                letter_source("four.pdf", 3),
            ],
        )
        .await;

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().name, "one.pdf");
    assert_eq!(results[1].as_ref().unwrap().page_count, 2);
    assert!(results[2].as_ref().unwrap_err().is_load_failure());
    assert_eq!(results[3].as_ref().unwrap().page_count, 3);

    assert_eq!(workspace.store().len(), 3);
    assert_eq!(workspace.plan().len(), 6);
    assert_eq!(workspace.last_error(), Some(LOAD_FAILED_MESSAGE));
}
