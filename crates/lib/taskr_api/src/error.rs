//! Application error types.

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use taskr_core::auth::AuthError;
use taskr_core::auth::password::MAX_PASSWORD_BYTES;
use taskr_core::store::StoreError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Username already registered")]
    UsernameTaken,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::UsernameTaken => (
                StatusCode::BAD_REQUEST,
                "username_taken",
                "Username already registered",
            ),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Internal(detail) => {
                error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateUsername(_) => AppError::UsernameTaken,
            StoreError::Db(e) => AppError::Internal(e.to_string()),
        }
    }
}

// Extractor rejections become 400s with the usual JSON error body.
macro_rules! rejection_into_validation {
    ($($rejection:ty),* $(,)?) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    AppError::Validation(rejection.body_text())
                }
            }
        )*
    };
}

rejection_into_validation!(JsonRejection, FormRejection, QueryRejection, PathRejection);

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UsernameTaken => AppError::UsernameTaken,
            AuthError::PasswordTooLong => AppError::Validation(format!(
                "password must be at most {MAX_PASSWORD_BYTES} bytes"
            )),
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Incorrect username or password".into())
            }
            // A missing user is reported like any other bad refresh token.
            AuthError::InvalidToken | AuthError::UserNotFound => {
                AppError::Unauthorized("Invalid refresh token".into())
            }
            AuthError::Unauthorized => {
                AppError::Unauthorized("Could not validate credentials".into())
            }
            AuthError::Store(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
