//! Request handlers for the web UI and its JSON endpoints.

pub mod auth;
pub mod file;
pub mod folder;
pub mod listing;
pub mod share;

pub use auth::*;
pub use file::*;
pub use folder::*;
pub use listing::*;
pub use share::*;
