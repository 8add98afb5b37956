//! Public share links.
//!
//! Anything served through [`PublicAccess`] skips authentication and
//! ownership checks, so the capability is kept to this one trait.

use std::future::Future;

use tracing::debug;

use super::metadata::FileRepository;
use super::service::{DownloadResult, FileService};
use crate::{CabinetError, Result};

/// Unauthenticated read access to a file by ID.
pub trait PublicAccess {
    /// Fetch a file and its content without any session or owner check.
    fn fetch_shared(&self, file_id: i64) -> impl Future<Output = Result<DownloadResult>> + Send;
}

impl PublicAccess for FileService<'_> {
    async fn fetch_shared(&self, file_id: i64) -> Result<DownloadResult> {
        let metadata = FileRepository::new(self.pool())
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| CabinetError::NotFound(format!("file {file_id}")))?;

        debug!(file_id, "Serving shared file");
        let content = self.storage().load(&metadata.filename)?;
        Ok(DownloadResult { metadata, content })
    }
}

/// Guess a content type from a stored name.
pub fn content_type_for(stored_name: &str) -> String {
    mime_guess::from_path(stored_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
