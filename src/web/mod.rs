//! Web layer for Cabinet.
//!
//! HTML pages for browsers plus the JSON endpoints the listing page calls.
//! Sessions are signed tokens in the `session` cookie.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;
pub mod templates;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
pub use state::AppState;
