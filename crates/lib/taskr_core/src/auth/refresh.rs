//! Refresh token registry.
//!
//! Holds the single currently-valid refresh token per user id. Storing a
//! new token overwrites the previous one, which is what makes rotation
//! invalidate the old value immediately.

use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::store::StoreError;

/// Storage for the current refresh token of each user.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Record `token` as the only valid refresh token for `user_id`.
    async fn store(&self, user_id: i64, token: &str) -> Result<(), StoreError>;

    /// The currently valid refresh token for `user_id`, if any.
    async fn get(&self, user_id: i64) -> Result<Option<String>, StoreError>;

    /// Forget the refresh token for `user_id`.
    async fn revoke(&self, user_id: i64) -> Result<(), StoreError>;
}

/// Process-local registry. Everything is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: DashMap<i64, String>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn store(&self, user_id: i64, token: &str) -> Result<(), StoreError> {
        self.tokens.insert(user_id, token.to_string());
        Ok(())
    }

    async fn get(&self, user_id: i64) -> Result<Option<String>, StoreError> {
        Ok(self.tokens.get(&user_id).map(|t| t.value().clone()))
    }

    async fn revoke(&self, user_id: i64) -> Result<(), StoreError> {
        self.tokens.remove(&user_id);
        Ok(())
    }
}

/// Exact-match comparison of a presented token with the stored one.
///
/// Both sides are reduced to SHA-256 digests and compared without an early
/// exit, so timing does not depend on where the strings first differ.
pub fn tokens_match(presented: &str, stored: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(stored.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
