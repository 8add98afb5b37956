//! File management module for Cabinet.
//!
//! This module provides:
//! - Per-user folder hierarchy with single-level cascade delete
//! - File metadata and blob storage
//! - Owner-only retrieval and public share links
//! - Storage accounting

mod folder;
mod hierarchy;
mod metadata;
mod service;
mod share;
mod storage;
mod usage;

pub use folder::{Folder, FolderRepository, NewFolder};
pub use hierarchy::{
    ensure_owner, parse_folder_ref, parse_folder_str, Children, Crumb, HierarchyService,
};
pub use metadata::{FileMetadata, FileRepository, NewFile};
pub use service::{DownloadResult, FileService, UploadPart, UploadedFile};
pub use share::{content_type_for, PublicAccess};
pub use storage::{sanitize_filename, FileStorage};
pub use usage::{compute_percent, compute_usage, format_size, StorageStats, STORAGE_CAP_BYTES};

/// Maximum number of ancestors walked when building a breadcrumb.
pub const MAX_FOLDER_DEPTH: usize = 64;
