//! Writing exported documents to disk.
//!
//! Writes are atomic by default: the content goes to a temporary file next
//! to the target, which is then renamed over it. A failed write never
//! leaves a truncated document at the target path.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{PdfPlanError, Result};
use crate::utils::format_file_size;

/// Options for writing files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writer for finished documents.
#[derive(Debug, Clone, Default)]
pub struct FileWriter {
    options: WriteOptions,
}

impl FileWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Write `bytes` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `FailedToWrite` if the file cannot be created, written or
    /// moved into place.
    pub async fn write(&self, path: &Path, bytes: Vec<u8>) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();

            let write_path = if options.atomic {
                temp_path(&path_buf)
            } else {
                path_buf.clone()
            };

            let failed = |path: &Path, source: std::io::Error| PdfPlanError::FailedToWrite {
                path: path.to_path_buf(),
                source,
            };

            let file = std::fs::File::create(&write_path).map_err(|e| failed(&write_path, e))?;
            let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);
            writer
                .write_all(&bytes)
                .and_then(|()| writer.flush())
                .map_err(|e| failed(&write_path, e))?;
            drop(writer);

            if options.atomic {
                if let Err(e) = std::fs::rename(&write_path, &path_buf) {
                    let _ = std::fs::remove_file(&write_path);
                    return Err(failed(&path_buf, e));
                }
            }

            Ok::<_, PdfPlanError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| PdfPlanError::other(format!("Write task failed: {e}")))??;

        log::debug!(
            "Wrote {} to {} in {:?}",
            stats.format_file_size(),
            stats.output_path.display(),
            stats.write_time
        );
        Ok(stats)
    }
}

/// Temporary sibling of `path` used during atomic writes.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
