//! Middleware for the web layer.

pub mod auth;
pub mod cors;
pub mod security;

pub use auth::{jwt_auth, AuthUser, JwtClaims, JwtState, SESSION_COOKIE};
pub use cors::create_cors_layer;
pub use security::security_headers;
