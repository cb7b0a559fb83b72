//! Small helpers shared across modules.

use chrono::{NaiveDate, Utc};
use std::path::Path;

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

/// Suggested file name for an export made on `date`: `merged-YYYY-MM-DD.pdf`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("merged-{}.pdf", date.format("%Y-%m-%d"))
}

/// Suggested file name for an export made today (UTC).
pub fn export_file_name_today() -> String {
    export_file_name(Utc::now().date_naive())
}

/// Check whether a file name carries the `.pdf` extension, ignoring case.
pub fn has_pdf_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
