//! Folder hierarchy operations for Cabinet.
//!
//! Listing, breadcrumb reconstruction, folder create/rename/delete and file
//! moves. Every mutating operation checks that the session user owns the rows
//! it touches.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::folder::{Folder, FolderRepository, NewFolder};
use super::metadata::{FileMetadata, FileRepository};
use super::MAX_FOLDER_DEPTH;
use crate::{CabinetError, Result};

/// One breadcrumb entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Crumb {
    /// Folder ID.
    pub id: i64,
    /// Folder name.
    pub name: String,
}

/// Contents of one folder level.
#[derive(Debug, Clone)]
pub struct Children {
    /// Child folders.
    pub folders: Vec<Folder>,
    /// Files, newest first.
    pub files: Vec<FileMetadata>,
}

/// Fail with `AccessDenied` unless `owner_id` is the session user.
pub fn ensure_owner(owner_id: i64, user_id: i64, what: &str) -> Result<()> {
    if owner_id != user_id {
        return Err(CabinetError::AccessDenied(what.to_string()));
    }
    Ok(())
}

/// Normalize a JSON folder reference into an optional folder ID.
///
/// `null`, `""` and `"null"` mean root. A number or a numeric string is an ID.
pub fn parse_folder_ref(value: Option<&Value>) -> Result<Option<i64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| CabinetError::Validation(format!("invalid folder id: {n}"))),
        Some(Value::String(s)) => parse_folder_str(s),
        Some(other) => Err(CabinetError::Validation(format!(
            "invalid folder id: {other}"
        ))),
    }
}

/// Normalize a textual folder reference (form or multipart field).
pub fn parse_folder_str(value: &str) -> Result<Option<i64>> {
    let value = value.trim();
    if value.is_empty() || value == "null" {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| CabinetError::Validation(format!("invalid folder id: {value:?}")))
}

/// Hierarchy service bound to a database pool.
pub struct HierarchyService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> HierarchyService<'a> {
    /// Create a new HierarchyService.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List the user's folders and files at one level (None = root).
    pub async fn list_children(&self, user_id: i64, folder_id: Option<i64>) -> Result<Children> {
        let folders = FolderRepository::new(self.pool)
            .list_children(user_id, folder_id)
            .await?;
        let files = FileRepository::new(self.pool)
            .list_in_folder(user_id, folder_id)
            .await?;
        Ok(Children { folders, files })
    }

    /// Load a folder and check it belongs to the user.
    pub async fn get_owned_folder(&self, user_id: i64, folder_id: i64) -> Result<Folder> {
        let folder = FolderRepository::new(self.pool)
            .get_by_id(folder_id)
            .await?
            .ok_or_else(|| CabinetError::NotFound(format!("folder {folder_id}")))?;
        ensure_owner(folder.user_id, user_id, &format!("folder {folder_id}"))?;
        Ok(folder)
    }

    /// Path from the top-most reachable ancestor down to `folder`, inclusive.
    ///
    /// A parent pointer to a deleted folder ends the walk there. A cycle or a
    /// chain longer than [`MAX_FOLDER_DEPTH`] is `CorruptHierarchy`.
    pub async fn breadcrumb(&self, folder: &Folder) -> Result<Vec<Crumb>> {
        let repo = FolderRepository::new(self.pool);
        let mut visited = HashSet::from([folder.id]);
        let mut crumbs = vec![Crumb {
            id: folder.id,
            name: folder.name.clone(),
        }];

        let mut next = folder.parent_id;
        while let Some(parent_id) = next {
            if !visited.insert(parent_id) {
                warn!(folder_id = folder.id, parent_id, "Folder parent chain loops");
                return Err(CabinetError::CorruptHierarchy(format!(
                    "folder {parent_id} appears twice above folder {}",
                    folder.id
                )));
            }
            if crumbs.len() >= MAX_FOLDER_DEPTH {
                return Err(CabinetError::CorruptHierarchy(format!(
                    "folder {} is nested deeper than {MAX_FOLDER_DEPTH}",
                    folder.id
                )));
            }

            let Some(parent) = repo.get_by_id(parent_id).await? else {
                break;
            };
            next = parent.parent_id;
            crumbs.push(Crumb {
                id: parent.id,
                name: parent.name,
            });
        }

        crumbs.reverse();
        Ok(crumbs)
    }

    /// Create a folder. The name is trimmed and must not be empty.
    ///
    /// A non-root parent must exist and belong to the user.
    pub async fn create_folder(
        &self,
        user_id: i64,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<Folder> {
        let name = validate_folder_name(name)?;
        if let Some(parent_id) = parent_id {
            self.get_owned_folder(user_id, parent_id).await?;
        }

        let folder = FolderRepository::new(self.pool)
            .create(&NewFolder::new(name, user_id).with_parent_opt(parent_id))
            .await?;

        info!(user_id, folder_id = folder.id, "Folder created");
        Ok(folder)
    }

    /// Rename a folder the user owns.
    pub async fn rename_folder(&self, user_id: i64, folder_id: i64, name: &str) -> Result<Folder> {
        let mut folder = self.get_owned_folder(user_id, folder_id).await?;
        let name = validate_folder_name(name)?;

        FolderRepository::new(self.pool)
            .rename(folder_id, name)
            .await?;
        folder.name = name.to_string();

        info!(user_id, folder_id, "Folder renamed");
        Ok(folder)
    }

    /// Delete a folder the user owns, one level deep. Blobs are untouched.
    pub async fn delete_folder(&self, user_id: i64, folder_id: i64) -> Result<()> {
        self.get_owned_folder(user_id, folder_id).await?;

        FolderRepository::new(self.pool)
            .delete_single_level(folder_id)
            .await?;

        info!(user_id, folder_id, "Folder deleted");
        Ok(())
    }

    /// Move a file the user owns into `folder_id` (None = root).
    ///
    /// A non-root target must exist and belong to the user.
    pub async fn move_file(&self, user_id: i64, file_id: i64, folder_id: Option<i64>) -> Result<()> {
        let files = FileRepository::new(self.pool);
        let file = files
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| CabinetError::NotFound(format!("file {file_id}")))?;
        ensure_owner(file.user_id, user_id, &format!("file {file_id}"))?;

        if let Some(target) = folder_id {
            self.get_owned_folder(user_id, target).await?;
        }

        files.set_folder(file_id, folder_id).await?;
        info!(user_id, file_id, folder_id = ?folder_id, "File moved");
        Ok(())
    }
}

fn validate_folder_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CabinetError::Validation("folder name is required".to_string()));
    }
    Ok(name)
}
