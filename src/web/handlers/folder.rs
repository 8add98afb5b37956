//! Folder handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::file::parse_folder_ref;
use crate::web::dto::{
    CreateFolderRequest, FolderInfo, RenameFolderRequest, SuccessResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

/// POST /folder/create - Create a folder under `parent_id` (root if absent).
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<Json<FolderInfo>, ApiError> {
    let parent_id = parse_folder_ref(req.parent_id.as_ref())?;
    let folder = state
        .hierarchy()
        .create_folder(user.id(), &req.name, parent_id)
        .await?;

    Ok(Json(FolderInfo::from(&folder)))
}

/// POST /folder/rename/:id
pub async fn rename_folder(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(folder_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<RenameFolderRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .hierarchy()
        .rename_folder(user.id(), folder_id, &req.name)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /folder/delete/:id - Single-level cascade delete.
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(folder_id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .hierarchy()
        .delete_folder(user.id(), folder_id)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
