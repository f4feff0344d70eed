//! Authentication service: register, login, refresh-token rotation and
//! bearer identity resolution.

use std::sync::Arc;

use chrono::Duration;
use taskr_core::auth::AuthError;
use taskr_core::auth::jwt::{TokenError, TokenIssuer};
use taskr_core::auth::password::{hash_password, verify_password};
use taskr_core::auth::refresh::{RefreshTokenStore, tokens_match};
use taskr_core::models::auth::{TokenKind, User, UserPublic};
use taskr_core::store::{StoreError, UserStore};
use tracing::{debug, info, warn};

use crate::models::TokenResponse;

/// Token type marker returned with every token pair.
pub const TOKEN_TYPE: &str = "bearer";

/// Orchestrates the credential store, token issuer and refresh registry.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    issuer: TokenIssuer,
    access_token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        issuer: TokenIssuer,
        access_token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            issuer,
            access_token_ttl,
        }
    }

    /// Register a new account.
    pub async fn register(&self, username: &str, password: &str) -> Result<UserPublic, AuthError> {
        if self.users.find_user_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = hash_password(password)?;

        // A concurrent registration can still win between the check above and
        // this insert; the store's uniqueness guarantee settles it.
        let user = match self.users.create_user(username, &password_hash).await {
            Ok(user) => user,
            Err(StoreError::DuplicateUsername(_)) => return Err(AuthError::UsernameTaken),
            Err(e) => return Err(e.into()),
        };

        info!(user_id = user.id, username, "user registered");
        Ok(UserPublic::from(&user))
    }

    /// Authenticate with username + password and open a session.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self
            .users
            .find_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_pair(&user).await?;
        info!(user_id = user.id, "login succeeded");
        Ok(tokens)
    }

    /// Exchange the current refresh token for a new pair, invalidating it.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let claims = self.issuer.verify_and_decode(refresh_token).map_err(|e| {
            debug!(reason = %e, "refresh token rejected");
            AuthError::InvalidToken
        })?;
        if claims.typ != TokenKind::Refresh || claims.sub.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .users
            .find_user_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let stored = self.refresh_tokens.get(user.id).await?;
        if !stored.is_some_and(|stored| tokens_match(refresh_token, &stored)) {
            warn!(user_id = user.id, "stale or unknown refresh token presented");
            return Err(AuthError::InvalidToken);
        }

        let tokens = self.issue_pair(&user).await?;
        debug!(user_id = user.id, "refresh token rotated");
        Ok(tokens)
    }

    /// Resolve a bearer access token to the user it was issued for.
    pub async fn resolve_identity(&self, access_token: &str) -> Result<User, AuthError> {
        let claims = self
            .issuer
            .verify_and_decode(access_token)
            .map_err(|e: TokenError| {
                debug!(reason = %e, "access token rejected");
                AuthError::Unauthorized
            })?;
        if claims.typ != TokenKind::Access {
            return Err(AuthError::Unauthorized);
        }

        self.users
            .find_user_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)
    }

    /// End the user's session by dropping their refresh token.
    pub async fn logout(&self, user: &User) -> Result<(), AuthError> {
        self.refresh_tokens.revoke(user.id).await?;
        info!(user_id = user.id, "logged out");
        Ok(())
    }

    /// Mint an access + refresh pair and register the refresh token.
    async fn issue_pair(&self, user: &User) -> Result<TokenResponse, AuthError> {
        let access_token = self
            .issuer
            .create_access_token(&user.username, self.access_token_ttl)?;
        let refresh_token = self.issuer.create_refresh_token(&user.username)?;
        self.refresh_tokens.store(user.id, &refresh_token).await?;
        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }
}
