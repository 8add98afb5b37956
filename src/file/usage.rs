//! Storage accounting.

use serde::Serialize;
use tracing::debug;

use super::metadata::FileMetadata;
use super::storage::FileStorage;

/// Fixed display cap used for the usage percentage (100 GiB).
pub const STORAGE_CAP_BYTES: u64 = 100 * 1024 * 1024 * 1024;

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;
const TB: f64 = GB * 1024.0;

/// Per-user dashboard statistics.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StorageStats {
    /// Number of folders owned by the user.
    pub folder_count: i64,
    /// Number of files owned by the user.
    pub file_count: i64,
    /// Human-readable total size.
    pub storage_used: String,
    /// Share of [`STORAGE_CAP_BYTES`], 0.0 to 100.0.
    pub storage_percent: f64,
    /// Raw total in bytes.
    pub total_bytes: u64,
}

impl StorageStats {
    /// Build stats from counts and a byte total.
    pub fn new(folder_count: i64, file_count: i64, total_bytes: u64) -> Self {
        Self {
            folder_count,
            file_count,
            storage_used: format_size(total_bytes),
            storage_percent: compute_percent(total_bytes),
            total_bytes,
        }
    }
}

/// Sum the blob sizes of the given files. Missing blobs count as zero.
pub fn compute_usage(storage: &FileStorage, files: &[FileMetadata]) -> u64 {
    files
        .iter()
        .map(|f| match storage.file_size(&f.filename) {
            Ok(size) => size,
            Err(e) => {
                debug!(file_id = f.id, "Skipping blob in usage total: {}", e);
                0
            }
        })
        .sum()
}

/// Format a byte count. Sizes below 1 MB are always shown in KB.
pub fn format_size(total_bytes: u64) -> String {
    let bytes = total_bytes as f64;
    if bytes < MB {
        format!("{:.1} KB", bytes / KB)
    } else if bytes < GB {
        format!("{:.2} MB", bytes / MB)
    } else if bytes < TB {
        format!("{:.2} GB", bytes / GB)
    } else {
        format!("{:.2} TB", bytes / TB)
    }
}

/// Percentage of the fixed cap, rounded to one decimal and capped at 100.
pub fn compute_percent(total_bytes: u64) -> f64 {
    let percent = total_bytes as f64 / STORAGE_CAP_BYTES as f64 * 100.0;
    ((percent * 10.0).round() / 10.0).min(100.0)
}
