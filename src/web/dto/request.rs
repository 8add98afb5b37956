//! Request DTOs for the web layer.

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use super::validation::no_control_chars;

/// Register/login form body.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsForm {
    /// Username.
    #[serde(default)]
    #[validate(length(max = 64), custom(function = "no_control_chars"))]
    pub username: String,
    /// Password.
    #[serde(default)]
    #[validate(length(max = 128))]
    pub password: String,
}

/// POST /folder/create body.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name (trimmed, must not be blank).
    #[serde(default)]
    #[validate(length(max = 255), custom(function = "no_control_chars"))]
    pub name: String,
    /// Parent folder: null, "", "null", an ID or a numeric string.
    #[serde(default)]
    pub parent_id: Option<Value>,
}

/// POST /folder/rename/:id body.
#[derive(Debug, Deserialize, Validate)]
pub struct RenameFolderRequest {
    /// New folder name.
    #[serde(default)]
    #[validate(length(max = 255), custom(function = "no_control_chars"))]
    pub name: String,
}

/// POST /file/move/:id body.
#[derive(Debug, Deserialize, Validate)]
pub struct MoveFileRequest {
    /// Target folder, same forms as `CreateFolderRequest::parent_id`.
    #[serde(default)]
    pub folder_id: Option<Value>,
}
