//! Storage for imported source documents.
//!
//! The store is append-only for the life of a workspace: documents are
//! registered once by import and never replaced, merged or evicted, even
//! when no plan entry refers to them anymore.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::utils::format_file_size;

/// Identifier of an imported source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One imported PDF: its raw bytes and what import learned about it.
///
/// The bytes are the authoritative copy of the document. Preview, thumbnail
/// and export each parse their own handle from them.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Identifier assigned at import.
    pub id: DocumentId,

    /// Original file name, for display.
    pub name: String,

    /// Number of pages reported by the parser at import.
    pub page_count: usize,

    bytes: Arc<[u8]>,
}

impl SourceDocument {
    /// Raw content of the original file.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the raw content in bytes.
    pub fn byte_length(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Format the size as a human-readable string.
    pub fn format_size(&self) -> String {
        format_file_size(self.byte_length())
    }
}

impl fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDocument")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("page_count", &self.page_count)
            .field("byte_length", &self.bytes.len())
            .finish()
    }
}

/// Append-only collection of source documents in registration order.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Arc<SourceDocument>>,
    index: HashMap<DocumentId, usize>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document and return its new identifier.
    ///
    /// Every call creates a new entry, even for identical content.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
        page_count: usize,
    ) -> DocumentId {
        let id = DocumentId::new();
        let document = SourceDocument {
            id,
            name: name.into(),
            page_count,
            bytes: bytes.into(),
        };

        log::debug!(
            "Registered document {} ({}, {} pages) as {}",
            document.name,
            document.format_size(),
            page_count,
            id
        );

        self.index.insert(id, self.documents.len());
        self.documents.push(Arc::new(document));
        id
    }

    /// Look up a document.
    pub fn get(&self, id: &DocumentId) -> Option<&SourceDocument> {
        self.index.get(id).map(|&i| self.documents[i].as_ref())
    }

    /// Look up a document as a shared handle.
    pub fn get_shared(&self, id: &DocumentId) -> Option<Arc<SourceDocument>> {
        self.index.get(id).map(|&i| Arc::clone(&self.documents[i]))
    }

    /// Check whether a document is registered.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if no document has been registered.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate documents in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceDocument> {
        self.documents.iter().map(Arc::as_ref)
    }

    /// Combined size of all stored documents.
    pub fn total_bytes(&self) -> u64 {
        self.iter().map(SourceDocument::byte_length).sum()
    }
}
