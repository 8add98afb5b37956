//! File service for Cabinet.
//!
//! Upload batches, owner-only download/preview/delete and storage statistics.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use super::folder::FolderRepository;
use super::hierarchy::{ensure_owner, HierarchyService};
use super::metadata::{FileMetadata, FileRepository, NewFile};
use super::storage::FileStorage;
use super::usage::{compute_usage, StorageStats};
use crate::{CabinetError, Result};

/// Attempts at finding a free stored name before giving up.
const MAX_NAME_ATTEMPTS: u32 = 8;

/// One file part of an upload batch.
#[derive(Debug, Clone)]
pub struct UploadPart {
    /// Client-supplied filename.
    pub filename: String,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadPart {
    /// Create a new upload part.
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

/// Summary of a stored upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    /// New file ID.
    pub id: i64,
    /// Original filename.
    pub name: String,
    /// Stored blob name.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
}

/// A file row together with its content.
#[derive(Debug)]
pub struct DownloadResult {
    /// File metadata.
    pub metadata: FileMetadata,
    /// File content.
    pub content: Vec<u8>,
}

/// File service bound to a database pool and a blob store.
pub struct FileService<'a> {
    pool: &'a SqlitePool,
    storage: &'a FileStorage,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(pool: &'a SqlitePool, storage: &'a FileStorage) -> Self {
        Self { pool, storage }
    }

    pub(crate) fn pool(&self) -> &'a SqlitePool {
        self.pool
    }

    pub(crate) fn storage(&self) -> &'a FileStorage {
        self.storage
    }

    /// Store a batch of uploads into `folder_id` (None = root).
    ///
    /// Parts with an empty filename are skipped. For each part the blob is
    /// written first and the row inserted second; a failed insert leaves the
    /// blob behind.
    pub async fn upload(
        &self,
        user_id: i64,
        folder_id: Option<i64>,
        parts: Vec<UploadPart>,
    ) -> Result<Vec<UploadedFile>> {
        if let Some(folder_id) = folder_id {
            HierarchyService::new(self.pool)
                .get_owned_folder(user_id, folder_id)
                .await?;
        }

        let repo = FileRepository::new(self.pool);
        let mut uploaded = Vec::with_capacity(parts.len());

        for part in parts {
            if part.filename.is_empty() {
                continue;
            }

            let stored_name = self.write_blob(&part)?;
            let new_file =
                NewFile::new(&stored_name, &part.filename, user_id).in_folder(folder_id);

            let metadata = repo.create(&new_file).await.map_err(|e| {
                error!(user_id, stored_name = %stored_name, "File row insert failed, blob kept: {}", e);
                e
            })?;

            info!(user_id, file_id = metadata.id, size = part.content.len(), "File uploaded");
            uploaded.push(UploadedFile {
                id: metadata.id,
                name: metadata.original_name,
                filename: metadata.filename,
                size: part.content.len() as u64,
            });
        }

        Ok(uploaded)
    }

    fn write_blob(&self, part: &UploadPart) -> Result<String> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let stored_name = FileStorage::generate_stored_name(&part.filename, Utc::now(), attempt);
            match self.storage.save_new(&stored_name, &part.content) {
                Ok(()) => return Ok(stored_name),
                Err(CabinetError::Conflict(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(CabinetError::Conflict(format!(
            "no free stored name for {}",
            part.filename
        )))
    }

    /// Load a file row and check it belongs to the user.
    pub async fn get_owned_file(&self, user_id: i64, file_id: i64) -> Result<FileMetadata> {
        let file = FileRepository::new(self.pool)
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| CabinetError::NotFound(format!("file {file_id}")))?;
        ensure_owner(file.user_id, user_id, &format!("file {file_id}"))?;
        Ok(file)
    }

    /// Fetch a file the user owns with its content.
    pub async fn download(&self, user_id: i64, file_id: i64) -> Result<DownloadResult> {
        let metadata = self.get_owned_file(user_id, file_id).await?;
        let content = self.storage.load(&metadata.filename)?;
        Ok(DownloadResult { metadata, content })
    }

    /// Like [`download`](Self::download), restricted to PDF files.
    pub async fn preview(&self, user_id: i64, file_id: i64) -> Result<DownloadResult> {
        let metadata = self.get_owned_file(user_id, file_id).await?;
        if !metadata.is_pdf() {
            return Err(CabinetError::UnsupportedType(
                "only PDF files can be previewed".to_string(),
            ));
        }
        let content = self.storage.load(&metadata.filename)?;
        Ok(DownloadResult { metadata, content })
    }

    /// Delete a file the user owns. Blob removal is best-effort.
    pub async fn delete(&self, user_id: i64, file_id: i64) -> Result<()> {
        let metadata = self.get_owned_file(user_id, file_id).await?;

        if let Err(e) = self.storage.delete(&metadata.filename) {
            warn!(file_id, "Blob delete failed, removing row anyway: {}", e);
        }

        FileRepository::new(self.pool).delete(file_id).await?;
        info!(user_id, file_id, "File deleted");
        Ok(())
    }

    /// Folder/file counts and storage usage for a user.
    pub async fn storage_stats(&self, user_id: i64) -> Result<StorageStats> {
        let files = FileRepository::new(self.pool).list_by_user(user_id).await?;
        let folder_count = FolderRepository::new(self.pool)
            .count_by_user(user_id)
            .await?;
        let total = compute_usage(self.storage, &files);
        Ok(StorageStats::new(folder_count, files.len() as i64, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;
    use tempfile::TempDir;

    struct Fixture {
        db: Database,
        storage: FileStorage,
        alice: i64,
        bob: i64,
        _tmp: TempDir,
    }

    async fn setup() -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("uploads")).unwrap();
        let users = UserRepository::new(db.pool());
        let alice = users.create(&NewUser::new("alice", "hash")).await.unwrap().id;
        let bob = users.create(&NewUser::new("bob", "hash")).await.unwrap().id;
        Fixture {
            db,
            storage,
            alice,
            bob,
            _tmp: tmp,
        }
    }

    #[tokio::test]
    async fn test_upload_download_preview_pdf() {
        let fx = setup().await;
        let svc = FileService::new(fx.db.pool(), &fx.storage);

        let uploaded = svc
            .upload(fx.alice, None, vec![UploadPart::new("report.pdf", b"%PDF-1.4".to_vec())])
            .await
            .unwrap();
        assert_eq!(uploaded.len(), 1);
        assert_eq!(uploaded[0].name, "report.pdf");
        assert!(uploaded[0].filename.ends_with("_report.pdf"));
        assert_eq!(uploaded[0].size, 8);

        let dl = svc.download(fx.alice, uploaded[0].id).await.unwrap();
        assert_eq!(dl.content, b"%PDF-1.4");
        assert_eq!(dl.metadata.original_name, "report.pdf");

        let pv = svc.preview(fx.alice, uploaded[0].id).await.unwrap();
        assert_eq!(pv.content, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_preview_rejects_non_pdf() {
        let fx = setup().await;
        let svc = FileService::new(fx.db.pool(), &fx.storage);

        let uploaded = svc
            .upload(fx.alice, None, vec![UploadPart::new("report.docx", b"PK".to_vec())])
            .await
            .unwrap();

        let result = svc.preview(fx.alice, uploaded[0].id).await;
        assert!(matches!(result, Err(CabinetError::UnsupportedType(_))));
    }

    #[tokio::test]
    async fn test_upload_skips_empty_filenames() {
        let fx = setup().await;
        let svc = FileService::new(fx.db.pool(), &fx.storage);

        let uploaded = svc
            .upload(
                fx.alice,
                None,
                vec![
                    UploadPart::new("", b"ignored".to_vec()),
                    UploadPart::new("a.txt", b"a".to_vec()),
                    UploadPart::new("a.txt", b"b".to_vec()),
                ],
            )
            .await
            .unwrap();

        assert_eq!(uploaded.len(), 2);
        assert_ne!(uploaded[0].filename, uploaded[1].filename);
    }

    #[tokio::test]
    async fn test_upload_into_foreign_folder_denied() {
        let fx = setup().await;
        let svc = FileService::new(fx.db.pool(), &fx.storage);
        let bobs = HierarchyService::new(fx.db.pool())
            .create_folder(fx.bob, "Bob", None)
            .await
            .unwrap();

        let result = svc
            .upload(fx.alice, Some(bobs.id), vec![UploadPart::new("x.txt", b"x".to_vec())])
            .await;

        assert!(matches!(result, Err(CabinetError::AccessDenied(_))));
        assert_eq!(std::fs::read_dir(fx.storage.base_path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_cross_user_access_denied() {
        let fx = setup().await;
        let svc = FileService::new(fx.db.pool(), &fx.storage);

        let uploaded = svc
            .upload(fx.alice, None, vec![UploadPart::new("secret.pdf", b"%PDF".to_vec())])
            .await
            .unwrap();
        let id = uploaded[0].id;

        assert!(matches!(
            svc.download(fx.bob, id).await,
            Err(CabinetError::AccessDenied(_))
        ));
        assert!(matches!(
            svc.preview(fx.bob, id).await,
            Err(CabinetError::AccessDenied(_))
        ));
        assert!(matches!(
            svc.delete(fx.bob, id).await,
            Err(CabinetError::AccessDenied(_))
        ));
        assert!(svc.download(fx.alice, id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_blob() {
        let fx = setup().await;
        let svc = FileService::new(fx.db.pool(), &fx.storage);

        let uploaded = svc
            .upload(fx.alice, None, vec![UploadPart::new("gone.txt", b"bye".to_vec())])
            .await
            .unwrap();
        let stored = uploaded[0].filename.clone();

        svc.delete(fx.alice, uploaded[0].id).await.unwrap();

        assert!(!fx.storage.exists(&stored));
        assert!(matches!(
            svc.download(fx.alice, uploaded[0].id).await,
            Err(CabinetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_with_missing_blob_still_removes_row() {
        let fx = setup().await;
        let svc = FileService::new(fx.db.pool(), &fx.storage);

        let uploaded = svc
            .upload(fx.alice, None, vec![UploadPart::new("x.txt", b"x".to_vec())])
            .await
            .unwrap();
        fx.storage.delete(&uploaded[0].filename).unwrap();

        svc.delete(fx.alice, uploaded[0].id).await.unwrap();
        assert_eq!(
            FileRepository::new(fx.db.pool())
                .count_by_user(fx.alice)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_download_missing_blob_is_not_found() {
        let fx = setup().await;
        let svc = FileService::new(fx.db.pool(), &fx.storage);

        let uploaded = svc
            .upload(fx.alice, None, vec![UploadPart::new("x.txt", b"x".to_vec())])
            .await
            .unwrap();
        fx.storage.delete(&uploaded[0].filename).unwrap();

        assert!(matches!(
            svc.download(fx.alice, uploaded[0].id).await,
            Err(CabinetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_storage_stats() {
        let fx = setup().await;
        let svc = FileService::new(fx.db.pool(), &fx.storage);
        HierarchyService::new(fx.db.pool())
            .create_folder(fx.alice, "Docs", None)
            .await
            .unwrap();

        svc.upload(
            fx.alice,
            None,
            vec![
                UploadPart::new("small.txt", vec![0u8; 500]),
                UploadPart::new("big.bin", vec![0u8; 2 * 1024 * 1024]),
            ],
        )
        .await
        .unwrap();

        let stats = svc.storage_stats(fx.alice).await.unwrap();
        assert_eq!(stats.folder_count, 1);
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_bytes, 500 + 2 * 1024 * 1024);
        assert_eq!(stats.storage_used, "2.00 MB");
        assert_eq!(stats.storage_percent, 0.0);

        let empty = svc.storage_stats(fx.bob).await.unwrap();
        assert_eq!(empty.storage_used, "0.0 KB");
    }
}
