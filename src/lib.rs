//! Cabinet - a personal file storage web application.
//!
//! Users upload files into a per-user folder hierarchy, then browse,
//! download, preview and share them.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{
    authenticate, hash_password, register, validate_password, verify_password, PasswordError,
};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{CabinetError, Result};
pub use file::{FileService, FileStorage, HierarchyService, PublicAccess};
pub use web::WebServer;
