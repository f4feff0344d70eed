//! Request and response bodies.

use serde::{Deserialize, Serialize};

pub use taskr_core::models::auth::UserPublic;
pub use taskr_core::models::task::{NewTask, Task};

/// `POST /auth/register` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// `POST /auth/login` form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /auth/refresh` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `POST /auth/refresh` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshQuery {
    pub refresh_token: Option<String>,
}

/// Issued token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// `GET /tasks` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<String>,
}

/// Error body returned for every non-2xx response, extractor rejections
/// included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
