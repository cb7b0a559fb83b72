//! Reading files offered for import.
//!
//! This module turns an [`ImportSource`] into an owned byte buffer with:
//! - File type and size checks run before any content is read
//! - Non-blocking reads of on-disk files
//! - A single read per file
//!
//! # Examples
//!
//! ```no_run
//! use pdfplan::io::reader::{ImportSource, SourceReader};
//! use pdfplan::validation::Validator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = SourceReader::new(Validator::default());
//! let file = reader.read(ImportSource::from_path("scan.pdf")).await?;
//! println!("Read {} ({} bytes)", file.name, file.bytes.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{PdfPlanError, Result};
use crate::validation::{Validator, display_name};

/// A file offered for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// A file on disk.
    Path(PathBuf),

    /// A file already held in memory, such as a browser upload.
    Memory {
        /// Original file name.
        name: String,
        /// Complete file content.
        bytes: Vec<u8>,
    },
}

impl ImportSource {
    /// Create a source for a file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Create a source for an in-memory file.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// File name shown to the user.
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => display_name(path),
            Self::Memory { name, .. } => name.clone(),
        }
    }
}

impl From<&Path> for ImportSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// A validated file and its full content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file name.
    pub name: String,

    /// Complete file content.
    pub bytes: Vec<u8>,

    /// Time spent reading the file.
    pub read_time: Duration,
}

/// Reader that validates and reads import sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceReader {
    validator: Validator,
}

impl SourceReader {
    /// Create a reader using the given validator.
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }

    /// The validator applied before reading.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate and read a source.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name does not end in `.pdf`
    /// - The file is larger than the size ceiling
    /// - An on-disk file cannot be read
    pub async fn read(&self, source: ImportSource) -> Result<SourceFile> {
        let start = Instant::now();

        let (name, bytes) = match source {
            ImportSource::Memory { name, bytes } => {
                self.validator.check_file(&name, bytes.len() as u64)?;
                (name, bytes)
            }
            ImportSource::Path(path) => {
                self.validator.validate_path(&path).await?;
                let bytes =
                    tokio::fs::read(&path)
                        .await
                        .map_err(|e| PdfPlanError::FileNotAccessible {
                            path: path.clone(),
                            source: e,
                        })?;

                let name = display_name(&path);
                // The file may have grown between the metadata check and the read.
                self.validator.check_size(&name, bytes.len() as u64)?;
                (name, bytes)
            }
        };

        let read_time = start.elapsed();
        log::debug!("Read {name} ({} bytes) in {read_time:?}", bytes.len());

        Ok(SourceFile {
            name,
            bytes,
            read_time,
        })
    }
}
