//! HTTP server for Cabinet.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::file::FileStorage;
use crate::{CabinetError, Database, Result};

use super::middleware::JwtState;
use super::router::create_router;
use super::state::AppState;

/// Web server bound to one address.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Assembled router.
    router: Router,
}

impl WebServer {
    /// Build the server from the configuration, an open database and a blob store.
    pub fn new(config: &Config, db: Database, storage: FileStorage) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| CabinetError::Config(format!("invalid server address: {e}")))?;

        let app_state = Arc::new(AppState::new(db, storage, config)?);
        let jwt_state = Arc::new(JwtState::new(&config.session.secret));
        let router = create_router(
            app_state,
            jwt_state,
            &config.server.cors_origins,
            config.storage.max_body_size_bytes(),
        );

        Ok(Self { addr, router })
    }

    /// Get the configured address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the server until it fails.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Cabinet listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router).await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Binding to port 0 picks a free port.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Cabinet listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, self.router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
