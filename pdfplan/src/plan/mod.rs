//! The page plan: the ordered list of pages that export will produce.
//!
//! Each [`PagePlanEntry`] points at one page of a source document by its
//! zero-based index in the *original* document. Entries are only created by
//! import, one per page in ascending page order. Editing then deletes,
//! moves and rotates them; the order of the plan is the order of the output.

pub mod editor;

pub use editor::PlanEditor;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use uuid::Uuid;

use crate::config::Rotation;
use crate::store::DocumentId;

/// Identifier of one occurrence of a page in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A reference to one page of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePlanEntry {
    /// Unique id of this occurrence.
    pub id: EntryId,
    /// Source document the page comes from.
    pub doc_id: DocumentId,
    /// Zero-based page index in the original document.
    pub page_index: u32,
    /// Clockwise rotation to apply on export.
    pub rotation: Rotation,
}

impl PagePlanEntry {
    /// Create an upright entry with a fresh id.
    pub fn new(doc_id: DocumentId, page_index: u32) -> Self {
        Self {
            id: EntryId::new(),
            doc_id,
            page_index,
            rotation: Rotation::None,
        }
    }

    /// One-based page number, as used by rendering backends.
    pub fn page_number(&self) -> u32 {
        self.page_index + 1
    }
}

/// Ordered sequence of plan entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PagePlan {
    entries: Vec<PagePlanEntry>,
}

impl PagePlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from existing entries, keeping their order.
    pub fn from_entries(entries: Vec<PagePlanEntry>) -> Self {
        Self { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the plan has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in output order.
    pub fn entries(&self) -> &[PagePlanEntry] {
        &self.entries
    }

    /// Iterate entries in output order.
    pub fn iter(&self) -> std::slice::Iter<'_, PagePlanEntry> {
        self.entries.iter()
    }

    /// Entry at a position.
    pub fn at(&self, index: usize) -> Option<&PagePlanEntry> {
        self.entries.get(index)
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &EntryId) -> Option<&PagePlanEntry> {
        self.entries.iter().find(|e| e.id == *id)
    }

    /// Position of an entry.
    pub fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == *id)
    }

    /// Check whether an entry is part of the plan.
    pub fn contains(&self, id: &EntryId) -> bool {
        self.position(id).is_some()
    }

    /// Append one entry per page of a document, in ascending page order.
    ///
    /// Returns the positions of the new entries. Page indices are `u32`;
    /// imports reject documents with more pages than that, and pages past
    /// `u32::MAX` are never appended.
    pub fn append_document(&mut self, doc_id: DocumentId, page_count: usize) -> Range<usize> {
        let start = self.entries.len();
        self.entries.extend(
            (0..page_count)
                .map_while(|index| u32::try_from(index).ok())
                .map(|page_index| PagePlanEntry::new(doc_id, page_index)),
        );
        start..self.entries.len()
    }

    /// Remove an entry, returning its former position and value.
    pub fn remove(&mut self, id: &EntryId) -> Option<(usize, PagePlanEntry)> {
        let index = self.position(id)?;
        Some((index, self.entries.remove(index)))
    }

    /// Move the entry at `from` so that it ends up at position `to`.
    ///
    /// Entries between the two positions shift by one slot toward `from`;
    /// all other relative orders are preserved. Returns `false` and leaves
    /// the plan untouched if either index is out of bounds.
    pub fn move_index(&mut self, from: usize, to: usize) -> bool {
        let len = self.entries.len();
        if from >= len || to >= len {
            return false;
        }

        if from < to {
            self.entries[from..=to].rotate_left(1);
        } else if from > to {
            self.entries[to..=from].rotate_right(1);
        }
        true
    }

    /// Set the rotation of an entry to `rotation` added to its current one.
    ///
    /// Returns the resulting rotation, or `None` if the entry is unknown.
    pub fn rotate(&mut self, id: &EntryId, rotation: Rotation) -> Option<Rotation> {
        let entry = self.entries.iter_mut().find(|e| e.id == *id)?;
        entry.rotation = entry.rotation.rotate_by(rotation);
        Some(entry.rotation)
    }

    /// Number of entries that refer to a document.
    pub fn count_for(&self, doc_id: &DocumentId) -> usize {
        self.entries.iter().filter(|e| e.doc_id == *doc_id).count()
    }
}

impl<'a> IntoIterator for &'a PagePlan {
    type Item = &'a PagePlanEntry;
    type IntoIter = std::slice::Iter<'a, PagePlanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
