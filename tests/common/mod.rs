//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use cabinet::config::Config;
use cabinet::file::FileStorage;
use cabinet::web::middleware::{JwtState, SESSION_COOKIE};
use cabinet::web::router::create_router;
use cabinet::web::AppState;
use cabinet::Database;
use serde_json::Value;
use tempfile::TempDir;

/// Session secret used by every test server.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// A router over an in-memory database and a temporary blob directory.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    upload_dir: TempDir,
}

impl TestApp {
    /// Directory holding the uploaded blobs.
    pub fn upload_dir(&self) -> &Path {
        self.upload_dir.path()
    }
}

/// Create a test app with the default body limit.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_limit(Config::default().storage.max_body_size_bytes()).await
}

/// Create a test app with a custom body limit in bytes.
pub async fn spawn_app_with_limit(max_body: usize) -> TestApp {
    let mut config = Config::default();
    config.session.secret = TEST_SECRET.to_string();

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let upload_dir = TempDir::new().expect("Failed to create upload dir");
    let storage = FileStorage::new(upload_dir.path()).expect("Failed to create storage");

    let app_state =
        Arc::new(AppState::new(db.clone(), storage, &config).expect("Failed to build state"));
    let jwt_state = Arc::new(JwtState::new(TEST_SECRET));
    let router = create_router(app_state, jwt_state, &[], max_body);

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        upload_dir,
    }
}

/// POST /register with form credentials.
pub async fn register(server: &TestServer, username: &str, password: &str) -> TestResponse {
    server
        .post("/register")
        .form(&[("username", username), ("password", password)])
        .await
}

/// POST /login with form credentials.
pub async fn login(server: &TestServer, username: &str, password: &str) -> TestResponse {
    server
        .post("/login")
        .form(&[("username", username), ("password", password)])
        .await
}

/// Register and log in, returning the session token.
pub async fn signup(server: &TestServer, username: &str) -> String {
    register(server, username, "password123").await;
    let response = login(server, username, "password123").await;
    response.cookie(SESSION_COOKIE).value().to_string()
}

/// `Authorization` header value for a session token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// GET a listing as JSON.
pub async fn listing(server: &TestServer, token: &str, path: &str) -> TestResponse {
    server
        .get(path)
        .add_header(AUTHORIZATION, bearer(token))
        .add_header(ACCEPT, "application/json")
        .await
}

/// Upload one file into `folder` (None = root), returning the JSON answer.
pub async fn upload(
    server: &TestServer,
    token: &str,
    name: &str,
    content: &[u8],
    folder: Option<i64>,
) -> TestResponse {
    let folder = folder.map_or_else(|| "null".to_string(), |id| id.to_string());
    let form = MultipartForm::new()
        .add_text("current_folder_id", folder)
        .add_part("files", Part::bytes(content.to_vec()).file_name(name));

    server
        .post("/upload")
        .add_header(AUTHORIZATION, bearer(token))
        .multipart(form)
        .await
}

/// Upload one file and return its ID.
pub async fn upload_id(
    server: &TestServer,
    token: &str,
    name: &str,
    content: &[u8],
    folder: Option<i64>,
) -> i64 {
    let response = upload(server, token, name, content, folder).await;
    response.assert_status_ok();
    response.json::<Value>()["files"][0]["id"]
        .as_i64()
        .expect("upload answer has an id")
}

/// Create a folder and return its ID.
pub async fn create_folder(
    server: &TestServer,
    token: &str,
    name: &str,
    parent_id: Option<i64>,
) -> i64 {
    let response = server
        .post("/folder/create")
        .add_header(AUTHORIZATION, bearer(token))
        .json(&serde_json::json!({ "name": name, "parent_id": parent_id }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["id"]
        .as_i64()
        .expect("create answer has an id")
}
