//! Error types for Cabinet.

use thiserror::Error;

/// Common error type for Cabinet.
#[derive(Error, Debug)]
pub enum CabinetError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (bad credentials, missing or expired session).
    #[error("authentication error: {0}")]
    Auth(String),

    /// The row exists but belongs to another user.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// The resource exists but cannot be served this way (e.g. preview of a non-PDF).
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Unique constraint collision (e.g. username taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Folder parent chain loops back on itself or is deeper than allowed.
    #[error("corrupt folder hierarchy: {0}")]
    CorruptHierarchy(String),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for CabinetError {
    fn from(e: sqlx::Error) -> Self {
        CabinetError::Database(e.to_string())
    }
}

/// Result type alias for Cabinet operations.
pub type Result<T> = std::result::Result<T, CabinetError>;
