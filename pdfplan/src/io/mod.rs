//! I/O operations for pdfplan.
//!
//! This module handles all file I/O operations including:
//! - Reading files offered for import, with checks before any content is read
//! - Writing exported documents to disk atomically
//!
//! # Examples
//!
//! ```no_run
//! use pdfplan::io::{ImportSource, read_source, write_file};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = read_source(ImportSource::from_path("input.pdf")).await?;
//! write_file(Path::new("copy.pdf"), file.bytes).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{ImportSource, SourceFile, SourceReader};
pub use writer::{FileWriter, WriteOptions, WriteStatistics};

use crate::error::Result;
use std::path::Path;

/// Validate and read one import source with the default size ceiling.
///
/// # Errors
///
/// Returns an error if the source is not a PDF, is too large, or cannot be read.
pub async fn read_source(source: ImportSource) -> Result<SourceFile> {
    SourceReader::default().read(source).await
}

/// Atomically write bytes to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn write_file(path: &Path, bytes: Vec<u8>) -> Result<()> {
    FileWriter::new().write(path, bytes).await?;
    Ok(())
}
