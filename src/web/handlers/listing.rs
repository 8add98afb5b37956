//! Dashboard listing handlers.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    Json,
};
use minijinja::Value;
use serde::Serialize;
use std::sync::Arc;

use crate::datetime::format_listing_date;
use crate::file::{Folder, FileMetadata};
use crate::web::dto::{FileEntry, FolderInfo, ListingResponse};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;
use crate::web::templates::{self, INDEX};

/// Template context for the listing page.
#[derive(Serialize)]
struct IndexPage<'a> {
    username: &'a str,
    #[serde(flatten)]
    listing: &'a ListingResponse,
}

/// GET / - Root listing.
pub async fn index(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let listing = build_listing(&state, user.id(), None, &headers).await?;
    respond(&state, &user, &headers, &listing)
}

/// GET /folder/:id - Listing of one folder.
pub async fn folder_index(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(folder_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let folder = state.hierarchy().get_owned_folder(user.id(), folder_id).await?;
    let listing = build_listing(&state, user.id(), Some(&folder), &headers).await?;
    respond(&state, &user, &headers, &listing)
}

async fn build_listing(
    state: &AppState,
    user_id: i64,
    folder: Option<&Folder>,
    headers: &HeaderMap,
) -> Result<ListingResponse, ApiError> {
    let hierarchy = state.hierarchy();
    let folder_id = folder.map(|f| f.id);

    let children = hierarchy.list_children(user_id, folder_id).await?;
    let breadcrumb = match folder {
        Some(folder) => hierarchy.breadcrumb(folder).await?,
        None => Vec::new(),
    };
    let stats = state.file_service().storage_stats(user_id).await?;

    let base_url = share_base_url(state, headers);
    let files = children
        .files
        .iter()
        .map(|file| file_entry(state, file, &base_url))
        .collect();

    Ok(ListingResponse {
        current_folder: folder.map(FolderInfo::from),
        breadcrumb,
        folders: children.folders.iter().map(FolderInfo::from).collect(),
        files,
        stats,
        current_folder_id: folder_id,
    })
}

fn file_entry(state: &AppState, file: &FileMetadata, base_url: &str) -> FileEntry {
    FileEntry {
        id: file.id,
        name: file.original_name.clone(),
        filename: file.filename.clone(),
        size: state.storage.file_size(&file.filename).unwrap_or(0),
        date: format_listing_date(&file.upload_date, &state.timezone),
        url: format!("/download/{}", file.id),
        preview_url: format!("/preview/{}", file.id),
        share_url: format!("{}/share/{}", base_url, file.id),
    }
}

/// Configured public URL, else `http://` plus the request's Host header.
fn share_base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.public_url {
        return url.clone();
    }
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_default()
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

fn respond(
    state: &AppState,
    user: &AuthUser,
    headers: &HeaderMap,
    listing: &ListingResponse,
) -> Result<Response, ApiError> {
    if wants_json(headers) {
        return Ok(Json(listing).into_response());
    }

    let page = IndexPage {
        username: &user.0.username,
        listing,
    };
    let html = templates::render(&state.templates, INDEX, Value::from_serialize(&page))?;
    Ok(Html(html).into_response())
}
