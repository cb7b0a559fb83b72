//! Editing operations on a page plan together with its selection.
//!
//! The selection is the entry shown in the preview. Mutations keep it
//! consistent with the plan:
//! - Appending pages selects the first new page when nothing is selected
//! - Deleting the selected entry selects its successor (or the new last entry)
//! - Moving and rotating never change the selection

use crate::config::Rotation;
use crate::error::{PdfPlanError, Result};
use crate::plan::{EntryId, PagePlan, PagePlanEntry};
use crate::store::DocumentId;

/// A page plan and the entry selected in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanEditor {
    plan: PagePlan,
    selection: Option<EntryId>,
}

impl PlanEditor {
    /// Create an editor over an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// The plan being edited.
    pub fn plan(&self) -> &PagePlan {
        &self.plan
    }

    /// The selected entry id, if any.
    pub fn selection(&self) -> Option<EntryId> {
        self.selection
    }

    /// The selected entry, if any.
    pub fn selected_entry(&self) -> Option<&PagePlanEntry> {
        self.selection.and_then(|id| self.plan.get(&id))
    }

    /// Position of the selected entry, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.selection.and_then(|id| self.plan.position(&id))
    }

    /// Append the pages of a freshly imported document.
    ///
    /// Selects the first appended entry when nothing was selected.
    /// Returns the ids of the new entries in page order.
    pub fn append_document(&mut self, doc_id: DocumentId, page_count: usize) -> Vec<EntryId> {
        let range = self.plan.append_document(doc_id, page_count);
        let added: Vec<EntryId> = self.plan.entries()[range].iter().map(|e| e.id).collect();

        if self.selection.is_none() {
            self.selection = added.first().copied();
        }

        added
    }

    /// Delete one entry.
    ///
    /// If it was selected, the entry that slid into its position becomes
    /// selected; when the tail was removed the new last entry is selected,
    /// and an emptied plan clears the selection. Unknown ids are a no-op.
    pub fn delete_entry(&mut self, id: &EntryId) -> Option<PagePlanEntry> {
        let (index, removed) = self.plan.remove(id)?;

        if self.selection == Some(*id) {
            self.selection = if self.plan.is_empty() {
                None
            } else {
                let slot = index.min(self.plan.len() - 1);
                self.plan.at(slot).map(|e| e.id)
            };
        }

        log::debug!("Deleted entry {id} at position {index}");
        Some(removed)
    }

    /// Move `active` to the position currently held by `over`.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if either id is not in the plan; the plan is
    /// then left unchanged.
    pub fn move_entry(&mut self, active: &EntryId, over: &EntryId) -> Result<()> {
        if active == over {
            return Ok(());
        }

        let from = self
            .plan
            .position(active)
            .ok_or_else(|| PdfPlanError::entry_not_found(*active))?;
        let to = self
            .plan
            .position(over)
            .ok_or_else(|| PdfPlanError::entry_not_found(*over))?;

        self.plan.move_index(from, to);
        log::debug!("Moved entry {active} from position {from} to {to}");
        Ok(())
    }

    /// Move the entry at position `from` to position `to`.
    ///
    /// Returns `false` if either index is out of bounds.
    pub fn move_index(&mut self, from: usize, to: usize) -> bool {
        self.plan.move_index(from, to)
    }

    /// Rotate an entry clockwise by `rotation`.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry is not in the plan.
    pub fn rotate_entry(&mut self, id: &EntryId, rotation: Rotation) -> Result<Rotation> {
        self.plan
            .rotate(id, rotation)
            .ok_or_else(|| PdfPlanError::entry_not_found(*id))
    }

    /// Select an entry. Returns `false` if it is not in the plan.
    pub fn select(&mut self, id: &EntryId) -> bool {
        if self.plan.contains(id) {
            self.selection = Some(*id);
            true
        } else {
            false
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Select the entry after the selected one. Returns `false` at the end.
    pub fn select_next(&mut self) -> bool {
        self.step_selection(1)
    }

    /// Select the entry before the selected one. Returns `false` at the start.
    pub fn select_previous(&mut self) -> bool {
        self.step_selection(-1)
    }

    fn step_selection(&mut self, delta: isize) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };

        let target = index as isize + delta;
        if target < 0 {
            return false;
        }

        match self.plan.at(target as usize) {
            Some(entry) => {
                self.selection = Some(entry.id);
                true
            }
            None => false,
        }
    }
}
