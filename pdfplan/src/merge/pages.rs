//! Page-level construction of the output document.
//!
//! This module handles page-level operations including:
//! - Loading source documents and indexing their pages
//! - Copying one page, with everything it references, into the output
//! - Flattening attributes a page inherits from its page tree
//! - Page rotation
//! - Assembling the output page tree and serializing it

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::Rotation;
use crate::error::{PdfPlanError, Result};
use crate::validation::classify_load_error;

/// Page attributes that may be inherited from an ancestor `Pages` node.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// US Letter, used when a page tree specifies no media box at all.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Look up a page attribute, walking up the page tree if the page lacks it.
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    // Bounded walk guards against cyclic Parent links.
    for _ in 0..64 {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent_id = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// Like [`inherited_attribute`], with an indirect value resolved.
fn resolved_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let value = inherited_attribute(doc, page_id, key)?;
    doc.dereference(value).ok().map(|(_, object)| object)
}

/// Media box of a page as `[x1, y1, x2, y2]`, resolving inheritance.
pub fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let array = resolved_attribute(doc, page_id, b"MediaBox").and_then(|obj| obj.as_array().ok());

    match array {
        Some(values) if values.len() >= 4 => {
            let mut rect = [0.0; 4];
            for (slot, value) in rect.iter_mut().zip(values) {
                match value.as_float() {
                    Ok(v) => *slot = v,
                    Err(_) => return DEFAULT_MEDIA_BOX,
                }
            }
            rect
        }
        _ => DEFAULT_MEDIA_BOX,
    }
}

/// Rotation a page declares in its `/Rotate`, resolving inheritance.
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> Rotation {
    resolved_attribute(doc, page_id, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .and_then(normalize_degrees)
        .and_then(|degrees| Rotation::from_degrees(degrees).ok())
        .unwrap_or_default()
}

/// Reduce a `/Rotate` value into `0..360`.
fn normalize_degrees(degrees: i64) -> Option<i32> {
    i32::try_from(degrees.rem_euclid(360)).ok()
}

/// A parsed source document held for the duration of one export.
///
/// Objects copied out of it are remembered, so that resources shared by
/// several of its pages (fonts, images) land in the output only once.
pub struct LoadedSource {
    name: String,
    document: Document,
    page_ids: Vec<ObjectId>,
    copied: BTreeMap<ObjectId, ObjectId>,
}

impl fmt::Debug for LoadedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedSource")
            .field("name", &self.name)
            .field("page_count", &self.page_ids.len())
            .field("copied", &self.copied.len())
            .finish()
    }
}

impl LoadedSource {
    /// Parse a source document from its stored bytes.
    ///
    /// # Errors
    ///
    /// Returns a load failure if the bytes are not a readable, unencrypted PDF.
    pub fn load(name: &str, bytes: &[u8]) -> Result<Self> {
        let document = Document::load_mem(bytes).map_err(|e| classify_load_error(name, &e))?;
        if document.trailer.has(b"Encrypt") {
            return Err(PdfPlanError::encrypted_pdf(name));
        }
        Ok(Self::from_document(name, document))
    }

    /// Wrap an already parsed document.
    pub fn from_document(name: &str, document: Document) -> Self {
        let page_ids = document.get_pages().into_values().collect();
        Self {
            name: name.to_string(),
            document,
            page_ids,
            copied: BTreeMap::new(),
        }
    }

    /// Number of pages in the source.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Object id of the page at a zero-based index.
    fn page_id(&self, page_index: u32) -> Result<ObjectId> {
        self.page_ids
            .get(page_index as usize)
            .copied()
            .ok_or_else(|| PdfPlanError::PageOutOfRange {
                name: self.name.clone(),
                page_index,
                page_count: self.page_ids.len(),
            })
    }
}

/// The document being assembled by an export.
pub struct OutputDocument {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl OutputDocument {
    /// Create an empty output document.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Copy the page at `page_index` of `source` into this document.
    ///
    /// The page dictionary and its annotations are always copied afresh, so
    /// the same source page may be copied any number of times. Resources
    /// shared with other pages are copied once. Inherited attributes are written
    /// onto the copy and its link to the source page tree is dropped. The
    /// copy is not part of the page tree until passed to [`add_page`].
    ///
    /// [`add_page`]: OutputDocument::add_page
    ///
    /// # Errors
    ///
    /// Returns `PageOutOfRange` if the source has no such page.
    pub fn copy_page(&mut self, source: &mut LoadedSource, page_index: u32) -> Result<ObjectId> {
        let page_id = source.page_id(page_index)?;
        let LoadedSource {
            document: src,
            copied,
            ..
        } = source;

        let mut page = src
            .get_dictionary(page_id)
            .map_err(|e| {
                PdfPlanError::export_failed(format!("Page object unreadable: {e}"))
            })?
            .clone();

        for key in INHERITABLE_KEYS {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(src, page_id, key) {
                page.set(key.to_vec(), value.clone());
            }
        }
        page.remove(b"Parent");
        let annots = page.remove(b"Annots");

        let new_page_id = self.document.new_object_id();
        // Links back to the page itself (annotation /P entries) point at the copy.
        copied.insert(page_id, new_page_id);
        let mut page = self.import_dictionary(src, copied, &page);
        copied.remove(&page_id);

        // Annotations belong to one page; each copy gets its own.
        if let Some(annots) = annots {
            let mut owned = BTreeMap::from([(page_id, new_page_id)]);
            page.set("Annots", self.import_object(src, &mut owned, &annots));
        }

        self.document
            .objects
            .insert(new_page_id, Object::Dictionary(page));
        Ok(new_page_id)
    }

    /// Rotate a copied page clockwise on top of its own `/Rotate`.
    pub fn rotate_page(&mut self, page_id: ObjectId, rotation: Rotation) -> Result<()> {
        if rotation == Rotation::None {
            return Ok(());
        }

        let page = self
            .document
            .get_dictionary(page_id)
            .map_err(|e| PdfPlanError::export_failed(format!("Failed to get page: {e}")))?;
        let current = page
            .get(b"Rotate")
            .and_then(|value| self.document.dereference(value))
            .and_then(|(_, value)| value.as_i64())
            .map_or(0, |degrees| degrees.rem_euclid(360));

        let new_rotation = (current + i64::from(rotation.as_degrees())).rem_euclid(360);
        let page = self
            .document
            .get_dictionary_mut(page_id)
            .map_err(|e| PdfPlanError::export_failed(format!("Failed to get page: {e}")))?;
        page.set("Rotate", Object::Integer(new_rotation));
        Ok(())
    }

    /// Append a copied page as the next output page.
    pub fn add_page(&mut self, page_id: ObjectId) {
        self.kids.push(page_id);
    }

    /// Set fields of the document information dictionary.
    pub fn set_info(&mut self, info: Dictionary) {
        let info_id = self.document.add_object(info);
        self.document.trailer.set("Info", info_id);
    }

    /// Finish the page tree and catalog and hand out the document.
    pub fn finish(mut self) -> Document {
        for &kid in &self.kids {
            if let Ok(page) = self.document.get_dictionary_mut(kid) {
                page.set("Parent", self.pages_id);
            }
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
            "Count" => self.kids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        self.document
    }

    /// Finish the document and serialize it.
    ///
    /// # Errors
    ///
    /// Returns `ExportFailed` if serialization fails.
    pub fn save(self, compress: bool) -> Result<Vec<u8>> {
        let mut document = self.finish();
        if compress {
            document.compress();
        }

        let mut bytes = Vec::new();
        document
            .save_to(&mut bytes)
            .map_err(|e| PdfPlanError::export_failed(format!("Failed to serialize PDF: {e}")))?;
        Ok(bytes)
    }

    fn import_object(
        &mut self,
        src: &Document,
        copied: &mut BTreeMap<ObjectId, ObjectId>,
        object: &Object,
    ) -> Object {
        match object {
            Object::Reference(id) => Object::Reference(self.import_reference(src, copied, *id)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.import_object(src, copied, item))
                    .collect(),
            ),
            Object::Dictionary(dict) => {
                Object::Dictionary(self.import_dictionary(src, copied, dict))
            }
            Object::Stream(stream) => {
                let mut stream = stream.clone();
                stream.dict = self.import_dictionary(src, copied, &stream.dict);
                Object::Stream(stream)
            }
            other => other.clone(),
        }
    }

    fn import_dictionary(
        &mut self,
        src: &Document,
        copied: &mut BTreeMap<ObjectId, ObjectId>,
        dict: &Dictionary,
    ) -> Dictionary {
        let mut imported = Dictionary::new();
        for (key, value) in dict.iter() {
            imported.set(key.clone(), self.import_object(src, copied, value));
        }
        imported
    }

    fn import_reference(
        &mut self,
        src: &Document,
        copied: &mut BTreeMap<ObjectId, ObjectId>,
        id: ObjectId,
    ) -> ObjectId {
        if let Some(&new_id) = copied.get(&id) {
            return new_id;
        }

        let new_id = self.document.new_object_id();
        copied.insert(id, new_id);

        // Page tree nodes and other pages are never pulled in through references.
        let object = match src.get_object(id) {
            Ok(object) if !is_page_tree_node(object) => self.import_object(src, copied, object),
            _ => Object::Null,
        };

        self.document.objects.insert(new_id, object);
        new_id
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    let Ok(dict) = object.as_dict() else {
        return false;
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page" | b"Pages" | b"Catalog")
    )
}
