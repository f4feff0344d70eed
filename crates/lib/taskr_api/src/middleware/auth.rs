//! Authentication middleware — Bearer token extraction and identity resolution.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use taskr_core::models::auth::User;

use crate::AppState;
use crate::error::AppError;

/// The resolved caller, stored in request extensions for protected handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Axum middleware: extracts `Authorization: Bearer <token>`, resolves it to
/// a user, and injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

    let token = bearer_token(header)
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;

    let user = state.auth.resolve_identity(token).await?;

    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}

/// The token part of a `Bearer` authorization header. The scheme is
/// case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
