//! Integration tests for editing the page plan.

use pdfplan::{EntryId, PagePlanEntry, PdfPlanError, Rotation, Workspace};
use rstest::rstest;

use crate::common::{import, letter_source, plan_ids};

async fn workspace_with_pages(count: usize) -> Workspace {
    let mut workspace = Workspace::new();
    import(&mut workspace, letter_source("pages.pdf", count)).await;
    workspace
}

#[tokio::test]
async fn test_delete_removes_exactly_one_entry() {
    let mut workspace = workspace_with_pages(5).await;
    let before: Vec<PagePlanEntry> = workspace.plan().entries().to_vec();
    let target = before[2].id;

    let removed = workspace.delete_entry(&target).unwrap();

    assert_eq!(removed, before[2]);
    assert_eq!(workspace.plan().len(), 4);
    assert!(!workspace.plan().contains(&target));

    let expected: Vec<PagePlanEntry> = before.into_iter().filter(|e| e.id != target).collect();
    assert_eq!(workspace.plan().entries(), expected.as_slice());
    assert_eq!(workspace.store().len(), 1);
}

#[rstest]
#[case(0, 3)]
#[case(3, 0)]
#[case(1, 4)]
#[case(4, 2)]
#[tokio::test]
async fn test_move_lands_at_target_position(#[case] from: usize, #[case] to: usize) {
    let mut workspace = workspace_with_pages(5).await;
    let ids = plan_ids(&workspace);

    workspace.move_entry(&ids[from], &ids[to]).unwrap();

    let after = plan_ids(&workspace);
    assert_eq!(after.len(), ids.len());
    assert_eq!(after[to], ids[from]);

    let mut sorted_before = ids.clone();
    let mut sorted_after = after.clone();
    sorted_before.sort();
    sorted_after.sort();
    assert_eq!(sorted_before, sorted_after);

    let others_before: Vec<EntryId> = ids.iter().copied().filter(|id| *id != ids[from]).collect();
    let others_after: Vec<EntryId> = after.iter().copied().filter(|id| *id != ids[from]).collect();
    assert_eq!(others_before, others_after);
}

#[tokio::test]
async fn test_move_onto_itself_is_noop() {
    let mut workspace = workspace_with_pages(3).await;
    let ids = plan_ids(&workspace);

    workspace.move_entry(&ids[1], &ids[1]).unwrap();
    assert_eq!(plan_ids(&workspace), ids);
}

#[tokio::test]
async fn test_move_with_stale_id_fails() {
    let mut workspace = workspace_with_pages(3).await;
    let ids = plan_ids(&workspace);
    workspace.delete_entry(&ids[0]);

    let err = workspace.move_entry(&ids[0], &ids[2]).unwrap_err();
    assert!(matches!(err, PdfPlanError::EntryNotFound { .. }));
    assert_eq!(plan_ids(&workspace), ids[1..]);
}

#[rstest]
#[case(0, 0)]
#[case(2, 2)]
#[case(4, 3)]
#[tokio::test]
async fn test_deleting_selection_selects_neighbor(#[case] deleted: usize, #[case] slot: usize) {
    let mut workspace = workspace_with_pages(5).await;
    let ids = plan_ids(&workspace);
    workspace.select(&ids[deleted]);

    workspace.delete_entry(&ids[deleted]);

    let expected = workspace.plan().at(slot).map(|e| e.id);
    assert_eq!(workspace.selection(), expected);
}

#[tokio::test]
async fn test_deleting_every_page_clears_selection() {
    let mut workspace = workspace_with_pages(3).await;

    while let Some(selected) = workspace.selection() {
        workspace.delete_entry(&selected);
    }

    assert!(workspace.plan().is_empty());
    assert_eq!(workspace.selection(), None);
    assert!(!workspace.can_export());
}

#[tokio::test]
async fn test_rotation_accumulates_per_entry() {
    let mut workspace = workspace_with_pages(2).await;
    let ids = plan_ids(&workspace);

    workspace.rotate_entry(&ids[1], Rotation::Clockwise90).unwrap();
    workspace.rotate_entry(&ids[1], Rotation::Clockwise270).unwrap();
    let rotation = workspace.rotate_entry(&ids[1], Rotation::Rotate180).unwrap();

    assert_eq!(rotation, Rotation::Rotate180);
    assert_eq!(workspace.plan().at(0).unwrap().rotation, Rotation::None);
}

#[tokio::test]
async fn test_navigation_follows_plan_order() {
    let mut workspace = workspace_with_pages(3).await;
    let ids = plan_ids(&workspace);
    workspace.move_entry(&ids[2], &ids[0]).unwrap();
    workspace.select(&ids[2]);

    assert!(workspace.select_next());
    assert_eq!(workspace.selection(), Some(ids[0]));
    assert!(workspace.select_previous());
    assert!(!workspace.select_previous());
    assert_eq!(workspace.selected_index(), Some(0));
}
