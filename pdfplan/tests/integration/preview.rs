//! Integration tests for previews and thumbnails.

use pdfplan::config::PreviewConfig;
use pdfplan::render::PreviewRenderer;
use pdfplan::{PdfPlanError, Rotation, Workspace};

use crate::common::{SolidRasterizer, import, pdf_source, plan_ids};

const RED: [u8; 4] = [255, 0, 0, 255];

#[tokio::test]
async fn test_render_selected_at_zoom() {
    let mut workspace = Workspace::new();
    import(&mut workspace, pdf_source("a.pdf", &[(200.0, 100.0), (400.0, 300.0)])).await;
    workspace.select_next();
    workspace.zoom_out();
    workspace.zoom_out();

    let renderer = PreviewRenderer::new(SolidRasterizer(RED), 2.0);
    let page = renderer.render_selected(&workspace).await.unwrap().unwrap();

    assert_eq!(page.page_number, 2);
    assert_eq!((page.css_width, page.css_height), (200, 150));
    assert_eq!((page.surface.width(), page.surface.height()), (400, 300));
    assert_eq!(page.surface.pixel(399, 299), Some(RED));
}

#[tokio::test]
async fn test_render_selected_without_selection() {
    let workspace = Workspace::new();
    let renderer = PreviewRenderer::new(SolidRasterizer(RED), 1.0);
    assert!(renderer.render_selected(&workspace).await.unwrap().is_none());
}

#[tokio::test]
async fn test_preview_includes_entry_rotation() {
    let mut workspace = Workspace::new();
    import(&mut workspace, pdf_source("a.pdf", &[(200.0, 100.0)])).await;
    let ids = plan_ids(&workspace);
    workspace.rotate_entry(&ids[0], Rotation::Clockwise90).unwrap();

    let renderer = PreviewRenderer::from_config(SolidRasterizer(RED), &PreviewConfig::default());
    let page = renderer.render_selected(&workspace).await.unwrap().unwrap();
    assert_eq!((page.css_width, page.css_height), (100, 200));
}

#[tokio::test]
async fn test_thumbnail_failures_are_isolated() {
    let mut workspace = Workspace::new();
    // The 2pt wide page is too narrow for a surface at thumbnail scale.
    import(
        &mut workspace,
        pdf_source("a.pdf", &[(100.0, 100.0), (2.0, 100.0), (50.0, 200.0)]),
    )
    .await;

    let renderer = PreviewRenderer::new(SolidRasterizer(RED), 1.0);
    let thumbnails = renderer.render_thumbnails(&workspace).await;

    assert_eq!(thumbnails.len(), 3);
    let ids = plan_ids(&workspace);
    for ((entry_id, _), expected) in thumbnails.iter().zip(&ids) {
        assert_eq!(entry_id, expected);
    }

    let first = thumbnails[0].1.as_ref().unwrap();
    assert_eq!((first.css_width, first.css_height), (30, 30));
    assert!(matches!(
        thumbnails[1].1,
        Err(PdfPlanError::SurfaceUnavailable { .. })
    ));
    let third = thumbnails[2].1.as_ref().unwrap();
    assert_eq!((third.css_width, third.css_height), (15, 60));
}

#[tokio::test]
async fn test_rendering_does_not_change_workspace() {
    let mut workspace = Workspace::new();
    import(&mut workspace, pdf_source("a.pdf", &[(100.0, 100.0), (100.0, 100.0)])).await;
    let plan_before = workspace.plan().clone();
    let selection_before = workspace.selection();

    let renderer = PreviewRenderer::new(SolidRasterizer(RED), 1.0);
    renderer.render_thumbnails(&workspace).await;
    renderer.render_selected(&workspace).await.unwrap();

    assert_eq!(workspace.plan(), &plan_before);
    assert_eq!(workspace.selection(), selection_before);
    assert_eq!(workspace.store().len(), 1);
}
