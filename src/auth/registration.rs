//! Account registration and login for Cabinet.

use tracing::{debug, info};

use crate::auth::{hash_password, verify_password, PasswordError};
use crate::db::{NewUser, User, UserRepository};
use crate::{CabinetError, Result};

/// Register a new account.
///
/// Fails with `Validation` on an empty username or password and with
/// `Conflict` when the username is taken.
pub async fn register(repo: &UserRepository<'_>, username: &str, password: &str) -> Result<User> {
    let username = username.trim();
    if username.is_empty() {
        return Err(CabinetError::Validation("username is required".to_string()));
    }

    if repo.username_exists(username).await? {
        return Err(CabinetError::Conflict(format!(
            "username {username} is taken"
        )));
    }

    let password_hash = hash_password(password).map_err(|e| match e {
        PasswordError::Empty | PasswordError::TooLong => CabinetError::Validation(e.to_string()),
        other => CabinetError::Auth(other.to_string()),
    })?;

    // the UNIQUE constraint still backs the check above under concurrent registration
    let user = repo.create(&NewUser::new(username, password_hash)).await?;

    info!(username = %user.username, user_id = user.id, "New user registered");
    Ok(user)
}

/// Check credentials and return the matching account.
///
/// Unknown usernames and wrong passwords produce the same `Auth` error.
pub async fn authenticate(
    repo: &UserRepository<'_>,
    username: &str,
    password: &str,
) -> Result<User> {
    let invalid = || CabinetError::Auth("invalid username or password".to_string());

    let Some(user) = repo.get_by_username(username.trim()).await? else {
        debug!(username = %username, "Login for unknown username");
        return Err(invalid());
    };

    verify_password(password, &user.password).map_err(|e| {
        debug!(user_id = user.id, "Login rejected: {}", e);
        invalid()
    })?;

    info!(user_id = user.id, "User logged in");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = register(&repo, "alice", "password123").await.unwrap();

        assert_eq!(user.username, "alice");
        assert!(user.password.starts_with("$argon2id$"));
        assert!(verify_password("password123", &user.password).is_ok());
    }

    #[tokio::test]
    async fn test_register_trims_username() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = register(&repo, "  bob ", "pw").await.unwrap();
        assert_eq!(user.username, "bob");
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        register(&repo, "alice", "password123").await.unwrap();
        let result = register(&repo, "alice", "another").await;

        assert!(matches!(result, Err(CabinetError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_empty_fields() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert!(matches!(
            register(&repo, "   ", "pw").await,
            Err(CabinetError::Validation(_))
        ));
        assert!(matches!(
            register(&repo, "alice", "").await,
            Err(CabinetError::Validation(_))
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        let created = register(&repo, "alice", "password123").await.unwrap();

        let user = authenticate(&repo, "alice", "password123").await.unwrap();
        assert_eq!(user.id, created.id);
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_indistinguishable() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        register(&repo, "alice", "password123").await.unwrap();

        let wrong_password = authenticate(&repo, "alice", "nope").await.unwrap_err();
        let unknown_user = authenticate(&repo, "mallory", "nope").await.unwrap_err();

        assert!(matches!(wrong_password, CabinetError::Auth(_)));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }
}
