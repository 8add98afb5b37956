//! Configuration module for Cabinet.

use serde::Deserialize;
use std::path::Path;

use crate::{CabinetError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timezone used when displaying upload dates (e.g., "Europe/Paris", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Public base URL used for share links (e.g., "https://files.example.com").
    ///
    /// When unset, share links are built from the request's Host header.
    #[serde(default)]
    pub public_url: Option<String>,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timezone: default_timezone(),
            public_url: None,
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection string.
    #[serde(default = "default_db_url")]
    pub url: String,
}

fn default_db_url() -> String {
    "sqlite://data/cabinet.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded file contents.
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    /// Maximum total request body size in megabytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size_mb: u64,
}

fn default_upload_path() -> String {
    "uploads".to_string()
}

fn default_max_body_size() -> u64 {
    200
}

impl StorageConfig {
    /// Maximum request body size in bytes, saturating at `usize::MAX`.
    pub fn max_body_size_bytes(&self) -> usize {
        let bytes = self.max_body_size_mb.saturating_mul(1024 * 1024);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_path: default_upload_path(),
            max_body_size_mb: default_max_body_size(),
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign session tokens (must be set).
    #[serde(default)]
    pub secret: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_expiry")]
    pub expiry_secs: u64,
    /// Whether the session cookie carries the Secure attribute.
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_session_expiry() -> u64 {
    7 * 24 * 3600 // 7 days
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiry_secs: default_session_expiry(),
            cookie_secure: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CabinetError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CabinetError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CABINET_SESSION_SECRET`: session signing secret
    /// - `CABINET_DATABASE_URL`: database connection string
    /// - `CABINET_UPLOAD_PATH`: blob storage directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("CABINET_SESSION_SECRET") {
            if !secret.is_empty() {
                self.session.secret = secret;
            }
        }
        if let Ok(url) = std::env::var("CABINET_DATABASE_URL") {
            if !url.is_empty() {
                self.database.url = url;
            }
        }
        if let Ok(path) = std::env::var("CABINET_UPLOAD_PATH") {
            if !path.is_empty() {
                self.storage.upload_path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the session secret is empty or the body limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.session.secret.is_empty() {
            return Err(CabinetError::Config(
                "session secret is not set. \
                 Set [session] secret in config.toml or CABINET_SESSION_SECRET."
                    .to_string(),
            ));
        }
        if self.storage.max_body_size_mb == 0 {
            return Err(CabinetError::Config(
                "max_body_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
