//! User persistence.
//!
//! Two backends implement [`UserStore`] and [`TaskStore`](crate::tasks::TaskStore):
//! [`memory::MemoryStore`] for local runs and tests, and
//! [`postgres::PgStore`] backed by `sqlx`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::auth::User;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The username is already taken. Raised by the store's own uniqueness
    /// guarantee, so concurrent registrations cannot both succeed.
    #[error("Username already registered: {0}")]
    DuplicateUsername(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Credential store: username → salted password hash.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::DuplicateUsername`] if the
    /// username exists.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    /// Fetch a user by username.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}
