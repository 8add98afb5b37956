//! Database schema and migrations for Cabinet.
//!
//! Migrations are applied in order when the database is opened.
//! The schema_version table tracks which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    password    TEXT NOT NULL,           -- Argon2 PHC string
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: folders
    r#"
-- parent_id is not a foreign key: a single-level cascade delete
-- leaves grandchildren pointing at a removed folder.
CREATE TABLE folders (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    parent_id   INTEGER,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_folders_user_parent ON folders(user_id, parent_id);
CREATE INDEX idx_folders_parent_id ON folders(parent_id);
"#,
    // v3: files
    r#"
CREATE TABLE files (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    filename        TEXT NOT NULL UNIQUE,    -- name in the blob store
    original_name   TEXT NOT NULL,
    folder_id       INTEGER,                 -- NULL means root
    user_id         INTEGER NOT NULL REFERENCES users(id),
    upload_date     TEXT NOT NULL
);

CREATE INDEX idx_files_user_folder ON files(user_id, folder_id);
CREATE INDEX idx_files_upload_date ON files(upload_date);
"#,
];
