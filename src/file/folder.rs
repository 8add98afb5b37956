//! Folder types and repository for Cabinet.

use sqlx::SqlitePool;

use crate::{CabinetError, Result};

/// A folder owned by a single user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Folder {
    /// Unique folder ID.
    pub id: i64,
    /// Folder name.
    pub name: String,
    /// Owning user ID.
    pub user_id: i64,
    /// Parent folder ID (None for root folders).
    ///
    /// May point at a folder that no longer exists after a single-level delete.
    pub parent_id: Option<i64>,
    /// When the folder was created.
    pub created_at: String,
}

/// Data for creating a new folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Owning user ID.
    pub user_id: i64,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<i64>,
}

impl NewFolder {
    /// Create a new root folder for the given user.
    pub fn new(name: impl Into<String>, user_id: i64) -> Self {
        Self {
            name: name.into(),
            user_id,
            parent_id: None,
        }
    }

    /// Set the parent folder.
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the parent folder from an optional ID (None = root).
    pub fn with_parent_opt(mut self, parent_id: Option<i64>) -> Self {
        self.parent_id = parent_id;
        self
    }
}

/// Repository for folder operations.
pub struct FolderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FolderRepository<'a> {
    /// Create a new FolderRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new folder.
    pub async fn create(&self, folder: &NewFolder) -> Result<Folder> {
        let result = sqlx::query("INSERT INTO folders (name, user_id, parent_id) VALUES (?, ?, ?)")
            .bind(&folder.name)
            .bind(folder.user_id)
            .bind(folder.parent_id)
            .execute(self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| CabinetError::NotFound("folder".to_string()))
    }

    /// Get a folder by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(
            "SELECT id, name, user_id, parent_id, created_at FROM folders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(folder)
    }

    /// List a user's folders directly under `parent_id` (None = root).
    pub async fn list_children(&self, user_id: i64, parent_id: Option<i64>) -> Result<Vec<Folder>> {
        // IS compares NULL to NULL as equal
        let folders = sqlx::query_as::<_, Folder>(
            "SELECT id, name, user_id, parent_id, created_at
             FROM folders WHERE user_id = ? AND parent_id IS ? ORDER BY id",
        )
        .bind(user_id)
        .bind(parent_id)
        .fetch_all(self.pool)
        .await?;

        Ok(folders)
    }

    /// Rename a folder. Returns false if no row matched.
    pub async fn rename(&self, id: i64, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE folders SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a folder one level deep, atomically.
    ///
    /// Files directly inside move to root, direct child folders are deleted,
    /// then the folder itself. Grandchildren keep their now-dangling `parent_id`.
    /// Returns false if the folder row did not exist.
    pub async fn delete_single_level(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE files SET folder_id = NULL WHERE folder_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM folders WHERE parent_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a user's folders.
    pub async fn count_by_user(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    async fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("owner", "hash"))
            .await
            .unwrap();
        (db, user.id)
    }

    #[tokio::test]
    async fn test_create_folder() {
        let (db, user_id) = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let folder = repo.create(&NewFolder::new("Documents", user_id)).await.unwrap();

        assert_eq!(folder.name, "Documents");
        assert_eq!(folder.user_id, user_id);
        assert!(folder.parent_id.is_none());
    }

    #[tokio::test]
    async fn test_get_folder_not_found() {
        let (db, _) = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_children_root_and_nested() {
        let (db, user_id) = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let a = repo.create(&NewFolder::new("A", user_id)).await.unwrap();
        repo.create(&NewFolder::new("B", user_id)).await.unwrap();
        repo.create(&NewFolder::new("A1", user_id).with_parent(a.id))
            .await
            .unwrap();

        let roots = repo.list_children(user_id, None).await.unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].name, "A");
        assert_eq!(roots[1].name, "B");

        let nested = repo.list_children(user_id, Some(a.id)).await.unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].name, "A1");
    }

    #[tokio::test]
    async fn test_list_children_filters_by_user() {
        let (db, user_id) = setup_db().await;
        let other = UserRepository::new(db.pool())
            .create(&NewUser::new("other", "hash"))
            .await
            .unwrap();
        let repo = FolderRepository::new(db.pool());

        repo.create(&NewFolder::new("Mine", user_id)).await.unwrap();
        repo.create(&NewFolder::new("Theirs", other.id)).await.unwrap();

        let mine = repo.list_children(user_id, None).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "Mine");
        assert_eq!(repo.count_by_user(other.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rename() {
        let (db, user_id) = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let folder = repo.create(&NewFolder::new("Old", user_id)).await.unwrap();
        assert!(repo.rename(folder.id, "New").await.unwrap());
        assert_eq!(repo.get_by_id(folder.id).await.unwrap().unwrap().name, "New");
        assert!(!repo.rename(9999, "Nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_single_level_keeps_grandchildren() {
        let (db, user_id) = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let f = repo.create(&NewFolder::new("F", user_id)).await.unwrap();
        let g = repo.create(&NewFolder::new("G", user_id).with_parent(f.id))
            .await
            .unwrap();
        let h = repo.create(&NewFolder::new("H", user_id).with_parent(g.id))
            .await
            .unwrap();

        assert!(repo.delete_single_level(f.id).await.unwrap());

        assert!(repo.get_by_id(f.id).await.unwrap().is_none());
        assert!(repo.get_by_id(g.id).await.unwrap().is_none());
        let h = repo.get_by_id(h.id).await.unwrap().unwrap();
        assert_eq!(h.parent_id, Some(g.id));
    }

    #[tokio::test]
    async fn test_delete_single_level_missing() {
        let (db, _) = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        assert!(!repo.delete_single_level(42).await.unwrap());
    }
}
