//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// Stored user, including the password hash. Never serialized to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// Public user view returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Which flow a token was minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the username.
    pub sub: String,
    /// Expiry (unix timestamp). Absent on refresh tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Per-token nonce, so two tokens minted in the same second still differ.
    pub jti: String,
    pub typ: TokenKind,
}
