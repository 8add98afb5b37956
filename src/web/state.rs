//! Shared application state.

use jsonwebtoken::{encode, EncodingKey, Header};
use minijinja::Environment;

use crate::config::Config;
use crate::db::{Database, User};
use crate::file::{FileService, FileStorage, HierarchyService};
use crate::web::error::ApiError;
use crate::web::middleware::JwtClaims;
use crate::web::templates;
use crate::Result;

/// Everything a handler needs, built once at startup.
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Blob store for uploaded content.
    pub storage: FileStorage,
    /// Page templates.
    pub templates: Environment<'static>,
    /// Session token signing key.
    pub encoding_key: EncodingKey,
    /// Session lifetime in seconds.
    pub session_expiry: u64,
    /// Whether the session cookie carries the `Secure` flag.
    pub cookie_secure: bool,
    /// Timezone for listing dates.
    pub timezone: String,
    /// Base URL for share links; falls back to the request host.
    pub public_url: Option<String>,
}

impl AppState {
    /// Build the state from an open database, a blob store and the configuration.
    pub fn new(db: Database, storage: FileStorage, config: &Config) -> Result<Self> {
        Ok(Self {
            db,
            storage,
            templates: templates::build_environment()?,
            encoding_key: EncodingKey::from_secret(config.session.secret.as_bytes()),
            session_expiry: config.session.expiry_secs,
            cookie_secure: config.session.cookie_secure,
            timezone: config.server.timezone.clone(),
            public_url: config
                .server
                .public_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    /// Sign a session token for a user.
    pub fn generate_session_token(&self, user: &User) -> std::result::Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user.id,
            username: user.username.clone(),
            iat: now,
            exp: now + self.session_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {}", e);
            ApiError::internal("Failed to create session")
        })
    }

    /// File operations over this state's pool and blob store.
    pub fn file_service(&self) -> FileService<'_> {
        FileService::new(self.db.pool(), &self.storage)
    }

    /// Folder operations over this state's pool.
    pub fn hierarchy(&self) -> HierarchyService<'_> {
        HierarchyService::new(self.db.pool())
    }
}
