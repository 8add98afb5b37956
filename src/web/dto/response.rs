//! Response DTOs for the web layer.

use serde::Serialize;

use crate::file::{Crumb, Folder, StorageStats, UploadedFile};

/// Plain `{"success": true}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    /// Always true on the success path.
    pub success: bool,
}

impl SuccessResponse {
    /// Successful acknowledgement.
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// POST /upload answer.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Files stored by this request.
    pub files: Vec<UploadedFile>,
}

/// Folder reference in listings and the create answer.
#[derive(Debug, Clone, Serialize)]
pub struct FolderInfo {
    /// Folder ID.
    pub id: i64,
    /// Folder name.
    pub name: String,
}

impl From<&Folder> for FolderInfo {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name.clone(),
        }
    }
}

/// One file row of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    /// File ID.
    pub id: i64,
    /// Original filename.
    pub name: String,
    /// Stored blob name.
    pub filename: String,
    /// Blob size in bytes (0 if the blob is missing).
    pub size: u64,
    /// Upload date, `dd/mm/YYYY HH:MM`.
    pub date: String,
    /// Download path.
    pub url: String,
    /// Preview path.
    pub preview_url: String,
    /// Absolute public share link.
    pub share_url: String,
}

/// Dashboard listing of one folder level.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    /// Folder being viewed (None at root).
    pub current_folder: Option<FolderInfo>,
    /// Path down to the current folder.
    pub breadcrumb: Vec<Crumb>,
    /// Child folders.
    pub folders: Vec<FolderInfo>,
    /// Files, newest first.
    pub files: Vec<FileEntry>,
    /// User-wide statistics.
    pub stats: StorageStats,
    /// Current folder ID (None at root).
    pub current_folder_id: Option<i64>,
}
