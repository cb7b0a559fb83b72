//! PDF metadata for exported documents.
//!
//! This module builds the Info dictionary written into every export:
//! - Title, Author, Subject, Keywords (when configured)
//! - Creator, Producer
//! - Creation and modification dates

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, StringFormat};

use crate::config::Metadata;

/// Producer string written into exported documents.
pub const PRODUCER: &str = concat!("pdfplan ", env!("CARGO_PKG_VERSION"));

/// Build the Info dictionary for an export created at `created`.
///
/// Only metadata fields that are set are written.
pub fn info_dictionary(metadata: &Metadata, created: DateTime<Utc>) -> Dictionary {
    let mut info = Dictionary::new();

    let fields = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Subject", &metadata.subject),
        ("Keywords", &metadata.keywords),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            info.set(key, text(value));
        }
    }

    info.set("Creator", text("pdfplan"));
    info.set("Producer", text(PRODUCER));

    let date = format_pdf_date(created);
    info.set("CreationDate", text(&date));
    info.set("ModDate", text(&date));

    info
}

/// Read the metadata fields back from a document's Info dictionary.
pub fn read_metadata(doc: &Document) -> Metadata {
    let info = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id));

    let Ok(info) = info else {
        return Metadata::default();
    };

    Metadata {
        title: string_field(info, b"Title"),
        author: string_field(info, b"Author"),
        subject: string_field(info, b"Subject"),
        keywords: string_field(info, b"Keywords"),
    }
}

fn string_field(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

fn text(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSSZ`).
pub fn format_pdf_date(time: DateTime<Utc>) -> String {
    time.format("D:%Y%m%d%H%M%SZ").to_string()
}
