//! Blob storage for Cabinet.
//!
//! Uploaded content lives in a single flat directory under a generated name:
//! ```text
//! {base_path}/
//! ├── 20240115_103000_123456_report.pdf
//! └── 20240115_103001_000042_holiday_photo.jpg
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use unicode_normalization::UnicodeNormalization;

use crate::{CabinetError, Result};

/// Timestamp prefix format for stored names (microsecond precision).
const STORED_NAME_TIMESTAMP: &str = "%Y%m%d_%H%M%S_%6f";

/// File storage service for managing blobs on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write a new blob, refusing to overwrite an existing one.
    ///
    /// Fails with `Conflict` if `stored_name` is already present.
    pub fn save_new(&self, stored_name: &str, content: &[u8]) -> Result<()> {
        let file_path = self.get_file_path(stored_name)?;

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
        {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(CabinetError::Conflict(format!("blob {stored_name} exists")));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = file.write_all(content) {
            drop(file);
            let _ = fs::remove_file(&file_path);
            return Err(e.into());
        }

        Ok(())
    }

    /// Load a blob's content.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        let file_path = self.get_file_path(stored_name)?;

        match fs::read(&file_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(CabinetError::NotFound(format!("blob {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it didn't exist.
    pub fn delete(&self, stored_name: &str) -> Result<bool> {
        let file_path = self.get_file_path(stored_name)?;

        match fs::remove_file(&file_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a blob exists.
    pub fn exists(&self, stored_name: &str) -> bool {
        self.get_file_path(stored_name)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    /// Get the size of a stored blob.
    pub fn file_size(&self, stored_name: &str) -> Result<u64> {
        let file_path = self.get_file_path(stored_name)?;

        match fs::metadata(&file_path) {
            Ok(m) => Ok(m.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(CabinetError::NotFound(format!("blob {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get the full path for a stored name.
    ///
    /// Names that could escape the base directory are rejected.
    pub fn get_file_path(&self, stored_name: &str) -> Result<PathBuf> {
        if stored_name.is_empty()
            || stored_name == "."
            || stored_name == ".."
            || stored_name.contains(['/', '\\', '\0'])
        {
            return Err(CabinetError::Validation(format!(
                "invalid stored name: {stored_name:?}"
            )));
        }
        Ok(self.base_path.join(stored_name))
    }

    /// Build the stored name for an upload: `sanitize("{timestamp}_{original}")`.
    ///
    /// `attempt` > 0 inserts a counter after the timestamp so a retry never
    /// reproduces a name that already collided.
    pub fn generate_stored_name(original_name: &str, now: DateTime<Utc>, attempt: u32) -> String {
        let ts = now.format(STORED_NAME_TIMESTAMP);
        let raw = if attempt == 0 {
            format!("{ts}_{original_name}")
        } else {
            format!("{ts}_{attempt}_{original_name}")
        };
        sanitize_filename(&raw)
    }
}

/// Reduce a client-supplied filename to a safe ASCII name.
///
/// The name is NFKD-normalized so accented and compatibility characters
/// keep their ASCII base. Path separators become spaces, remaining
/// non-ASCII characters are dropped,
/// whitespace runs are joined with `_`, anything outside `[A-Za-z0-9_.-]`
/// is removed and leading/trailing `.` and `_` are trimmed.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
