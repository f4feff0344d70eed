//! Authentication request handlers.

use axum::body::Bytes;
use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::{Extension, Form, Json};
use taskr_core::auth::password::MAX_PASSWORD_BYTES;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    LoginRequest, LogoutResponse, RefreshQuery, RefreshRequest, RegisterRequest, TokenResponse,
    UserPublic,
};

/// `POST /auth/register` — create a new user account.
///
/// Surrounding whitespace is stripped from the username before it is stored.
pub async fn register_handler(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<Json<UserPublic>> {
    let Json(body) = body?;
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "username and password are required".into(),
        ));
    }
    if body.password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Validation(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    let user = state.auth.register(username, &body.password).await?;
    Ok(Json(user))
}

/// `POST /auth/login` — authenticate with form-encoded username + password.
pub async fn login_handler(
    State(state): State<AppState>,
    body: Result<Form<LoginRequest>, FormRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Form(body) = body?;
    let resp = state
        .auth
        .login(body.username.trim(), &body.password)
        .await?;
    Ok(Json(resp))
}

/// `POST /auth/refresh` — exchange a refresh token for a new token pair.
///
/// The token may come as a `refresh_token` query parameter or a JSON body.
pub async fn refresh_handler(
    State(state): State<AppState>,
    query: Result<Query<RefreshQuery>, QueryRejection>,
    body: Bytes,
) -> AppResult<Json<TokenResponse>> {
    let Query(query) = query?;
    let refresh_token = match query.refresh_token {
        Some(token) => token,
        None if !body.is_empty() => {
            serde_json::from_slice::<RefreshRequest>(&body)
                .map_err(|e| AppError::Validation(format!("invalid refresh request: {e}")))?
                .refresh_token
        }
        None => return Err(AppError::Validation("refresh_token is required".into())),
    };
    let resp = state.auth.refresh(&refresh_token).await?;
    Ok(Json(resp))
}

/// `POST /auth/logout` — revoke the caller's refresh token.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<LogoutResponse>> {
    state.auth.logout(&user.0).await?;
    Ok(Json(LogoutResponse { success: true }))
}

/// `GET /auth/me` — the authenticated caller.
pub async fn me_handler(Extension(user): Extension<AuthenticatedUser>) -> Json<UserPublic> {
    Json(UserPublic::from(&user.0))
}
