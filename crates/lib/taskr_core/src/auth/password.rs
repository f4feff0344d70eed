//! Password hashing via bcrypt.

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Longest password bcrypt can hash without truncation. Its 72-byte input
/// includes the trailing NUL.
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Hash a password with bcrypt (cost 10). Every call draws a fresh salt.
///
/// Passwords over [`MAX_PASSWORD_BYTES`] fail with `PasswordTooLong` rather
/// than being silently cut short.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::non_truncating_hash(password, BCRYPT_COST).map_err(|e| match e {
        bcrypt::BcryptError::Truncation(_) => AuthError::PasswordTooLong,
        e => AuthError::Internal(format!("bcrypt hash: {e}")),
    })
}

/// Verify a password against a bcrypt hash.
///
/// A malformed hash, or a password too long to compare in full, counts as a
/// mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::non_truncating_verify(password, hash).unwrap_or(false)
}
