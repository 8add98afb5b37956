//! Authentication module for Cabinet.
//!
//! Password hashing plus account registration and login.

mod password;
mod registration;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
};
pub use registration::{authenticate, register};
