//! JWT token generation and verification.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub use jsonwebtoken::Algorithm;

use super::AuthError;
use crate::models::auth::{TokenClaims, TokenKind};

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Returns true for the HMAC algorithms a shared secret can sign with.
pub fn is_symmetric(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

/// Mints and verifies access and refresh tokens with one process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Build an issuer for `secret`. Only HS256/HS384/HS512 are accepted.
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Result<Self, AuthError> {
        if !is_symmetric(algorithm) {
            return Err(AuthError::Internal(format!(
                "unsupported signing algorithm {algorithm:?}; use HS256, HS384 or HS512"
            )));
        }
        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    /// Generate a signed access token for `subject`, valid for `ttl`.
    pub fn create_access_token(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.to_string(),
            exp: Some((now + ttl).timestamp()),
            iat: now.timestamp(),
            jti: new_jti(),
            typ: TokenKind::Access,
        };
        self.sign(&claims)
    }

    /// Generate a signed refresh token for `subject`.
    ///
    /// Refresh tokens carry no `exp`; they stay valid until the registry
    /// rotates them out.
    pub fn create_refresh_token(&self, subject: &str) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: subject.to_string(),
            exp: None,
            iat: Utc::now().timestamp(),
            jti: new_jti(),
            typ: TokenKind::Refresh,
        };
        self.sign(&claims)
    }

    /// Verify the signature, then the expiry if one is present.
    pub fn verify_and_decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;
        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }
}

fn new_jti() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Resolve the JWT secret: env var `JWT_SECRET` → `SECRET_KEY` → persisted file.
pub fn resolve_jwt_secret() -> String {
    for var in ["JWT_SECRET", "SECRET_KEY"] {
        if let Ok(secret) = std::env::var(var)
            && !secret.is_empty()
        {
            return secret;
        }
    }
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new JWT secret");
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskr")
        .join("jwt-secret")
}
