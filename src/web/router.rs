//! Router configuration.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_folder, delete_file, delete_folder, download, folder_index, index, login, login_page,
    logout, move_file, preview, register, register_page, rename_folder, share, upload,
};
use super::middleware::{create_cors_layer, jwt_auth, security_headers, JwtState};
use super::state::AppState;

/// Create the application router.
///
/// `max_body` caps every request body, uploads included.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
    max_body: usize,
) -> Router {
    // No session required
    let public_routes = Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/share/:id", get(share))
        .route("/health", get(health_check));

    // Handlers reject with 401 through the AuthUser extractor
    let session_routes = Router::new()
        .route("/logout", get(logout))
        .route("/", get(index))
        .route("/folder/:id", get(folder_index))
        .route("/upload", post(upload))
        .route("/download/:id", get(download))
        .route("/preview/:id", get(preview))
        .route("/delete/:id", delete(delete_file))
        .route("/file/move/:id", post(move_file))
        .route("/folder/create", post(create_folder))
        .route("/folder/rename/:id", post(rename_folder))
        .route("/folder/delete/:id", delete(delete_folder));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
