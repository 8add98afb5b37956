//! Public share link handler.

use axum::{
    extract::{Path, State},
    response::Response,
};
use std::sync::Arc;

use super::file::blob_response;
use crate::file::{content_type_for, PublicAccess};
use crate::web::error::ApiError;
use crate::web::state::AppState;

/// GET /share/:id - Serve a file inline without a session.
pub async fn share(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<i64>,
) -> Result<Response, ApiError> {
    let result = state.file_service().fetch_shared(file_id).await?;

    blob_response(
        &content_type_for(&result.metadata.filename),
        "inline".to_string(),
        result.content,
    )
}
