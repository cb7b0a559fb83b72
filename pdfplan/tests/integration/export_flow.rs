//! Integration tests for exporting the page plan.

use pdfplan::config::{ExportOptions, Metadata};
use pdfplan::merge::{Exporter, export_plan};
use pdfplan::{DocumentStore, PagePlan, PdfPlanError, Rotation, Workspace, WorkspaceConfig};

use crate::common::{import, letter_source, pdf_source, plan_ids, read_output, temp_output_path};

#[tokio::test]
async fn test_export_follows_plan_order_across_documents() {
    let mut workspace = Workspace::new();
    let a = import(
        &mut workspace,
        pdf_source("a.pdf", &[(100.0, 300.0), (100.0, 400.0)]),
    )
    .await;
    let b = import(&mut workspace, pdf_source("b.pdf", &[(200.0, 300.0)])).await;

    // [a0, a1, b0] -> [a1, b0, a0]
    workspace.move_entry(&a.entry_ids[0], &b.entry_ids[0]).unwrap();
    let order: Vec<_> = workspace
        .plan()
        .iter()
        .map(|e| (e.doc_id, e.page_index))
        .collect();
    assert_eq!(order, [(a.doc_id, 1), (b.doc_id, 0), (a.doc_id, 0)]);

    let exported = workspace.export().await.unwrap();
    assert_eq!(exported.page_count, 3);

    let pages = read_output(&exported.bytes);
    let widths: Vec<f32> = pages.iter().map(|p| p.width).collect();
    let heights: Vec<f32> = pages.iter().map(|p| p.height).collect();
    assert_eq!(widths, [100.0, 200.0, 100.0]);
    assert_eq!(heights, [400.0, 300.0, 300.0]);

    let first = String::from_utf8_lossy(&pages[0].content).into_owned();
    let last = String::from_utf8_lossy(&pages[2].content).into_owned();
    assert!(first.contains("Page 2"), "unexpected content: {first}");
    assert!(last.contains("Page 1"), "unexpected content: {last}");
}

#[tokio::test]
async fn test_export_of_empty_plan_is_rejected() {
    let result = export_plan(&PagePlan::new(), &DocumentStore::new()).await;
    assert!(matches!(result, Err(PdfPlanError::EmptyPlan)));
}

#[tokio::test]
async fn test_export_after_deleting_everything() {
    let mut workspace = Workspace::new();
    import(&mut workspace, letter_source("a.pdf", 2)).await;
    for id in plan_ids(&workspace) {
        workspace.delete_entry(&id);
    }

    let err = workspace.export().await.unwrap_err();
    assert!(matches!(err, PdfPlanError::EmptyPlan));
    assert_eq!(workspace.store().len(), 1);
}

#[tokio::test]
async fn test_reexport_is_stable() {
    let mut workspace = Workspace::new();
    import(
        &mut workspace,
        pdf_source("mixed.pdf", &[(100.0, 100.0), (250.0, 120.0), (612.0, 792.0)]),
    )
    .await;
    let ids = plan_ids(&workspace);
    workspace.move_entry(&ids[2], &ids[0]).unwrap();

    let first = workspace.export().await.unwrap();
    let second = workspace.export().await.unwrap();

    assert_eq!(first.page_count, second.page_count);
    assert_eq!(read_output(&first.bytes), read_output(&second.bytes));
}

#[tokio::test]
async fn test_duplicate_pages_are_independent_copies() {
    let mut workspace = Workspace::new();
    import(&mut workspace, letter_source("a.pdf", 1)).await;
    import(&mut workspace, letter_source("a.pdf", 1)).await;

    let exported = workspace.export().await.unwrap();
    let pages = read_output(&exported.bytes);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0], pages[1]);
}

#[tokio::test]
async fn test_rotation_is_written_to_output() {
    let mut workspace = Workspace::new();
    import(&mut workspace, letter_source("a.pdf", 2)).await;
    let ids = plan_ids(&workspace);
    workspace.rotate_entry(&ids[1], Rotation::Clockwise270).unwrap();

    let exported = workspace.export().await.unwrap();
    let rotations: Vec<i64> = read_output(&exported.bytes).iter().map(|p| p.rotate).collect();
    assert_eq!(rotations, [0, 270]);
}

#[tokio::test]
async fn test_uncompressed_export_with_metadata() {
    let config = WorkspaceConfig {
        export: ExportOptions {
            compress: false,
            apply_rotation: true,
            metadata: Metadata {
                title: Some("Combined".to_string()),
                ..Default::default()
            },
        },
        ..Default::default()
    };
    let mut workspace = Workspace::with_config(config);
    import(&mut workspace, letter_source("a.pdf", 1)).await;

    let exported = workspace.export().await.unwrap();
    let doc = lopdf::Document::load_mem(&exported.bytes).unwrap();
    assert_eq!(
        pdfplan::merge::metadata::read_metadata(&doc).title.as_deref(),
        Some("Combined")
    );
}

#[tokio::test]
async fn test_save_exported_pdf() {
    let mut store = DocumentStore::new();
    let doc_id = store.register("a.pdf", crate::common::build_pdf(&[(300.0, 300.0)]), 1);
    let mut plan = PagePlan::new();
    plan.append_document(doc_id, 1);

    let exported = Exporter::new().export(&plan, &store).await.unwrap();
    assert_eq!(exported.media_type, "application/pdf");

    let output = temp_output_path();
    let stats = exported.save(&output).await.unwrap();

    assert_eq!(stats.file_size, exported.byte_length());
    assert_eq!(std::fs::read(&output).unwrap(), exported.bytes);
}
