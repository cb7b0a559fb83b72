//! Error types for pdfplan.
//!
//! Every fallible operation in the crate returns [`PdfPlanError`]. Errors
//! carry enough context to log a useful diagnostic, while
//! [`PdfPlanError::user_message`] reduces them to the single line an editor
//! shows to its user.
//!
//! # Error Categories
//!
//! - **Import Errors**: oversized files, wrong file type, corrupt or protected PDFs
//! - **Plan Errors**: unknown entries, dangling document references
//! - **Export Errors**: empty plans, page copy failures, write failures
//! - **Render Errors**: raster surface allocation and drawing failures

use std::io;
use std::path::PathBuf;

use crate::plan::EntryId;
use crate::store::DocumentId;

/// Result type alias for pdfplan operations.
pub type Result<T> = std::result::Result<T, PdfPlanError>;

/// Message shown to the user when a file cannot be imported.
pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load PDF. It might be corrupted or password protected.";

/// Main error type for pdfplan operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfPlanError {
    /// Imported file is larger than the configured ceiling.
    #[error("File size exceeds {}MB limit: {name}", .limit / (1024 * 1024))]
    SizeLimitExceeded {
        /// Name of the rejected file.
        name: String,
        /// Size of the file in bytes.
        size: u64,
        /// Ceiling in bytes.
        limit: u64,
    },

    /// Imported file is not a PDF.
    #[error("Unsupported file type (only .pdf files are accepted): {name}")]
    UnsupportedFileType {
        /// Name of the rejected file.
        name: String,
    },

    /// The parser could not read the document.
    #[error("Failed to load PDF: {name}\n  Reason: {reason}")]
    ParseFailure {
        /// Name of the file being parsed.
        name: String,
        /// Reason reported by the parser.
        reason: String,
    },

    /// The document is encrypted or password protected.
    #[error("PDF is encrypted and cannot be processed: {name}")]
    EncryptedPdf {
        /// Name of the encrypted file.
        name: String,
    },

    /// An on-disk source could not be read.
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A plan entry refers to a document that is not in the store.
    #[error("Document not found for id {doc_id}")]
    MissingDocument {
        /// The dangling document id.
        doc_id: DocumentId,
    },

    /// No plan entry has the given id.
    #[error("Page entry not found: {entry_id}")]
    EntryNotFound {
        /// The unknown entry id.
        entry_id: EntryId,
    },

    /// A page index points past the end of its source document.
    #[error("Page {} does not exist in {name} (document has {page_count} page(s))", .page_index + 1)]
    PageOutOfRange {
        /// Name of the source document.
        name: String,
        /// Zero-based page index that was requested.
        page_index: u32,
        /// Pages in the source document.
        page_count: usize,
    },

    /// Export was requested for an empty plan.
    #[error("No pages to export")]
    EmptyPlan,

    /// A raster surface of the requested size could not be allocated.
    #[error("Canvas context not available for a {width}x{height} surface")]
    SurfaceUnavailable {
        /// Requested width in device pixels.
        width: u32,
        /// Requested height in device pixels.
        height: u32,
    },

    /// Drawing a page failed.
    #[error("Failed to render page: {reason}")]
    RenderFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Assembling the output document failed.
    #[error("Export failed: {reason}")]
    ExportFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Writing an exported document to disk failed.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfPlanError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfPlanError {
    /// Create a SizeLimitExceeded error.
    pub fn size_limit_exceeded(name: impl Into<String>, size: u64, limit: u64) -> Self {
        Self::SizeLimitExceeded {
            name: name.into(),
            size,
            limit,
        }
    }

    /// Create an UnsupportedFileType error.
    pub fn unsupported_file_type(name: impl Into<String>) -> Self {
        Self::UnsupportedFileType { name: name.into() }
    }

    /// Create a ParseFailure error.
    pub fn parse_failure(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseFailure {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(name: impl Into<String>) -> Self {
        Self::EncryptedPdf { name: name.into() }
    }

    /// Create a MissingDocument error.
    pub fn missing_document(doc_id: DocumentId) -> Self {
        Self::MissingDocument { doc_id }
    }

    /// Create an EntryNotFound error.
    pub fn entry_not_found(entry_id: EntryId) -> Self {
        Self::EntryNotFound { entry_id }
    }

    /// Create a RenderFailed error.
    pub fn render_failed(reason: impl Into<String>) -> Self {
        Self::RenderFailed {
            reason: reason.into(),
        }
    }

    /// Create an ExportFailed error.
    pub fn export_failed(reason: impl Into<String>) -> Self {
        Self::ExportFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Attach a file name to a load failure raised before the name was known.
    pub fn for_file(self, name: &str) -> Self {
        match self {
            Self::ParseFailure { reason, .. } => Self::parse_failure(name, reason),
            Self::EncryptedPdf { .. } => Self::encrypted_pdf(name),
            other => other,
        }
    }

    /// Check if the parser rejected the document content.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::ParseFailure { .. } | Self::EncryptedPdf { .. })
    }

    /// Check if this error is recoverable by retrying or picking another file.
    ///
    /// Only dangling document references are not: they mean the workspace
    /// itself is inconsistent.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::MissingDocument { .. })
    }

    /// The single line shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::ParseFailure { .. } | Self::EncryptedPdf { .. } => LOAD_FAILED_MESSAGE.to_string(),
            Self::SizeLimitExceeded { .. } | Self::UnsupportedFileType { .. } => self.to_string(),
            Self::FileNotAccessible { path, .. } => {
                format!("Could not read file: {}", path.display())
            }
            Self::EmptyPlan => "Add at least one page before exporting.".to_string(),
            Self::MissingDocument { .. }
            | Self::PageOutOfRange { .. }
            | Self::ExportFailed { .. }
            | Self::FailedToWrite { .. } => "Export failed. See the log for details.".to_string(),
            _ => self.to_string(),
        }
    }
}
