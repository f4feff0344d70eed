//! API server configuration.

use std::str::FromStr;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use taskr_core::auth::jwt::{is_symmetric, resolve_jwt_secret};
use thiserror::Error;

/// Default access token lifetime in minutes.
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 30;

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported JWT algorithm '{0}' (expected HS256, HS384 or HS512)")]
    Algorithm(String),

    #[error("invalid access token ttl '{0}' (expected a positive number of minutes)")]
    AccessTokenTtl(String),
}

/// Configuration for the API server. Fixed once the server starts.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// PostgreSQL connection URL. `None` selects the in-memory stores.
    pub database_url: Option<String>,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Symmetric JWT signing algorithm.
    pub jwt_algorithm: Algorithm,
    /// Access token lifetime in minutes.
    pub access_token_ttl_minutes: i64,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .finish()
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                      | Default                          |
    /// |-------------------------------|----------------------------------|
    /// | `BIND_ADDR`                   | `127.0.0.1:3100`                 |
    /// | `DATABASE_URL`                | unset (in-memory stores)         |
    /// | `JWT_SECRET` / `SECRET_KEY`   | generated & persisted to file    |
    /// | `JWT_ALGORITHM`               | `HS256`                          |
    /// | `ACCESS_TOKEN_EXPIRE_MINUTES` | `30`                             |
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_algorithm = match std::env::var("JWT_ALGORITHM") {
            Ok(v) => parse_algorithm(&v)?,
            Err(_) => Algorithm::HS256,
        };
        let access_token_ttl_minutes = match std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(v) => parse_ttl_minutes(&v)?,
            Err(_) => DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
        };
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3100".into()),
            database_url: std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            jwt_secret: resolve_jwt_secret(),
            jwt_algorithm,
            access_token_ttl_minutes,
        })
    }

    /// Access token lifetime as a duration.
    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_ttl_minutes)
    }
}

/// Parse an HMAC algorithm name such as `HS256`.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    Algorithm::from_str(name.trim())
        .ok()
        .filter(|alg| is_symmetric(*alg))
        .ok_or_else(|| ConfigError::Algorithm(name.to_string()))
}

/// Parse a positive minute count.
pub fn parse_ttl_minutes(value: &str) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|m| *m > 0)
        .ok_or_else(|| ConfigError::AccessTokenTtl(value.to_string()))
}
