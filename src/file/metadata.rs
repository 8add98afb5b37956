//! File metadata types and repository for Cabinet.

use sqlx::SqlitePool;

use crate::{CabinetError, Result};

/// Metadata row for an uploaded file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileMetadata {
    /// Unique file ID.
    pub id: i64,
    /// Name of the blob in the file store (unique).
    pub filename: String,
    /// Name the file was uploaded with.
    pub original_name: String,
    /// Containing folder ID (None = root).
    pub folder_id: Option<i64>,
    /// Owning user ID.
    pub user_id: i64,
    /// Upload timestamp, UTC, `YYYY-MM-DD HH:MM:SS.ffffff`.
    pub upload_date: String,
}

impl FileMetadata {
    /// Whether the stored name has a `.pdf` extension (case-insensitive).
    pub fn is_pdf(&self) -> bool {
        self.filename.to_ascii_lowercase().ends_with(".pdf")
    }
}

/// Data for creating a new file entry.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Stored blob name.
    pub filename: String,
    /// Original upload name.
    pub original_name: String,
    /// Containing folder ID (None = root).
    pub folder_id: Option<i64>,
    /// Owning user ID.
    pub user_id: i64,
    /// Upload timestamp.
    pub upload_date: String,
}

impl NewFile {
    /// Create a new file entry at root, timestamped now.
    pub fn new(filename: impl Into<String>, original_name: impl Into<String>, user_id: i64) -> Self {
        Self {
            filename: filename.into(),
            original_name: original_name.into(),
            folder_id: None,
            user_id,
            upload_date: crate::datetime::now_for_storage(),
        }
    }

    /// Set the containing folder (None = root).
    pub fn in_folder(mut self, folder_id: Option<i64>) -> Self {
        self.folder_id = folder_id;
        self
    }

    /// Override the upload timestamp.
    pub fn with_upload_date(mut self, upload_date: impl Into<String>) -> Self {
        self.upload_date = upload_date.into();
        self
    }
}

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new file entry.
    pub async fn create(&self, file: &NewFile) -> Result<FileMetadata> {
        let result = sqlx::query(
            "INSERT INTO files (filename, original_name, folder_id, user_id, upload_date)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&file.filename)
        .bind(&file.original_name)
        .bind(file.folder_id)
        .bind(file.user_id)
        .bind(&file.upload_date)
        .execute(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                CabinetError::Conflict(format!("stored name {} already used", file.filename))
            }
            other => CabinetError::from(other),
        })?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| CabinetError::NotFound("file".to_string()))
    }

    /// Get a file by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileMetadata>> {
        let file = sqlx::query_as::<_, FileMetadata>(
            "SELECT id, filename, original_name, folder_id, user_id, upload_date
             FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(file)
    }

    /// List a user's files in a folder (None = root), newest first.
    pub async fn list_in_folder(
        &self,
        user_id: i64,
        folder_id: Option<i64>,
    ) -> Result<Vec<FileMetadata>> {
        let files = sqlx::query_as::<_, FileMetadata>(
            "SELECT id, filename, original_name, folder_id, user_id, upload_date
             FROM files WHERE user_id = ? AND folder_id IS ?
             ORDER BY upload_date DESC, id DESC",
        )
        .bind(user_id)
        .bind(folder_id)
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }

    /// List every file owned by a user, wherever it lives.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<FileMetadata>> {
        let files = sqlx::query_as::<_, FileMetadata>(
            "SELECT id, filename, original_name, folder_id, user_id, upload_date
             FROM files WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }

    /// Move a file to another folder (None = root). Returns false if no row matched.
    pub async fn set_folder(&self, id: i64, folder_id: Option<i64>) -> Result<bool> {
        let result = sqlx::query("UPDATE files SET folder_id = ? WHERE id = ?")
            .bind(folder_id)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a file row. Returns false if no row matched.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a user's files.
    pub async fn count_by_user(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
