//! File handlers: upload, download, preview, delete, move.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::file::{content_type_for, parse_folder_ref, parse_folder_str, UploadPart};
use crate::web::dto::{MoveFileRequest, SuccessResponse, UploadResponse, ValidatedJson};
use crate::web::error::{ApiError, ErrorCode};
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;

/// Build a Content-Disposition value for `kind` (`attachment` or `inline`).
///
/// Control characters are dropped and quotes/backslashes replaced in the
/// plain `filename`; non-ASCII or special names also get an RFC 5987
/// `filename*`.
fn content_disposition_header(kind: &str, filename: &str) -> String {
    let needs_encoding = !filename.is_ascii()
        || filename
            .chars()
            .any(|c| c.is_control() || c == '"' || c == '\\');

    if !needs_encoding {
        return format!("{}; filename=\"{}\"", kind, filename);
    }

    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        kind,
        fallback,
        urlencoding::encode(filename)
    )
}

/// Stream a whole blob with the given headers.
pub(super) fn blob_response(
    content_type: &str,
    disposition: String,
    content: Vec<u8>,
) -> Result<Response, ApiError> {
    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::new(ErrorCode::PayloadTooLarge, "Upload exceeds the size limit");
    }
    tracing::debug!("Failed to read multipart field: {}", e);
    ApiError::bad_request("Invalid multipart data")
}

/// POST /upload - Store every `files` part into `current_folder_id`.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut parts = Vec::new();
    let mut folder_id = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "files" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content = field.bytes().await.map_err(multipart_error)?;
                parts.push(UploadPart::new(filename, content.to_vec()));
            }
            "current_folder_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                folder_id = parse_folder_str(&text)?;
            }
            _ => {}
        }
    }

    let files = state
        .file_service()
        .upload(user.id(), folder_id, parts)
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        files,
    }))
}

/// GET /download/:id - Owner-only attachment download.
pub async fn download(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Response, ApiError> {
    let result = state.file_service().download(user.id(), file_id).await?;

    blob_response(
        &content_type_for(&result.metadata.filename),
        content_disposition_header("attachment", &result.metadata.original_name),
        result.content,
    )
}

/// GET /preview/:id - Owner-only inline PDF.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Response, ApiError> {
    let result = state.file_service().preview(user.id(), file_id).await?;

    blob_response(
        "application/pdf",
        content_disposition_header("inline", &result.metadata.original_name),
        result.content,
    )
}

/// DELETE /delete/:id - Remove a file row and its blob.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.file_service().delete(user.id(), file_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /file/move/:id - Reparent a file.
pub async fn move_file(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(file_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<MoveFileRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let folder_id = parse_folder_ref(req.folder_id.as_ref())?;
    state
        .hierarchy()
        .move_file(user.id(), file_id, folder_id)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
