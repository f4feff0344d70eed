//! Authentication primitives.
//!
//! Password hashing, JWT issuance/verification and the refresh token
//! registry, shared by the `taskr_api` auth service and identity resolver.

pub mod jwt;
pub mod password;
pub mod refresh;

use thiserror::Error;

use crate::store::StoreError;

/// Authentication errors.
///
/// `InvalidCredentials` deliberately does not say whether the user was
/// missing or the password was wrong.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already registered")]
    UsernameTaken,

    #[error("Password is too long")]
    PasswordTooLong,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidToken,

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("User not found")]
    UserNotFound,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
