//! Pre-parse validation of imported files.
//!
//! These checks run before any byte of a file reaches the parser:
//! - File type (`.pdf` extension)
//! - Size ceiling, read from file metadata for on-disk files
//! - Existence and accessibility of on-disk files
//!
//! It also classifies parser failures into corrupt versus protected input.
//!
//! # Examples
//!
//! ```
//! use pdfplan::validation::Validator;
//!
//! let validator = Validator::new(1024);
//! assert!(validator.check_file("scan.pdf", 512).is_ok());
//! assert!(validator.check_file("scan.pdf", 4096).is_err());
//! assert!(validator.check_file("scan.png", 512).is_err());
//! ```

use std::path::Path;

use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::error::{PdfPlanError, Result};
use crate::utils::has_pdf_extension;

/// Validator for files offered to import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_file_size: u64,
}

impl Validator {
    /// Create a validator with the given size ceiling in bytes.
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Size ceiling in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Check that a file name is acceptable for import.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFileType` unless the name ends in `.pdf`.
    pub fn check_name(&self, name: &str) -> Result<()> {
        if has_pdf_extension(name) {
            Ok(())
        } else {
            Err(PdfPlanError::unsupported_file_type(name))
        }
    }

    /// Check a file size against the ceiling.
    ///
    /// A file exactly at the ceiling is accepted.
    ///
    /// # Errors
    ///
    /// Returns `SizeLimitExceeded` if `size` is above the ceiling.
    pub fn check_size(&self, name: &str, size: u64) -> Result<()> {
        if size > self.max_file_size {
            return Err(PdfPlanError::size_limit_exceeded(
                name,
                size,
                self.max_file_size,
            ));
        }
        Ok(())
    }

    /// Run the name and size checks.
    pub fn check_file(&self, name: &str, size: u64) -> Result<()> {
        self.check_name(name)?;
        self.check_size(name, size)
    }

    /// Validate an on-disk file from its metadata alone, returning its size.
    ///
    /// The file content is not read, so oversized files cost nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, not a regular file, not a
    /// PDF, or above the ceiling.
    pub async fn validate_path(&self, path: &Path) -> Result<u64> {
        let name = display_name(path);
        self.check_name(&name)?;

        let metadata =
            tokio::fs::metadata(path)
                .await
                .map_err(|e| PdfPlanError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: e,
                })?;

        if !metadata.is_file() {
            return Err(PdfPlanError::FileNotAccessible {
                path: path.to_path_buf(),
                source: std::io::Error::other("not a regular file"),
            });
        }

        self.check_size(&name, metadata.len())?;
        Ok(metadata.len())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

/// Map a parser error onto the import error taxonomy.
pub fn classify_load_error(name: &str, err: &lopdf::Error) -> PdfPlanError {
    let err_msg = err.to_string();
    let lowered = err_msg.to_lowercase();
    if lowered.contains("encrypt") || lowered.contains("decrypt") || lowered.contains("password")
    {
        PdfPlanError::encrypted_pdf(name)
    } else {
        PdfPlanError::parse_failure(name, err_msg)
    }
}

/// File name of a path, for messages and for the document store.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
