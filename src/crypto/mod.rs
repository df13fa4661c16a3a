//! Password hashing for user credentials.
//!
//! Thin wrapper over bcrypt. Hashing is salted and non-deterministic;
//! verification is deterministic. A mismatched password is `Ok(false)`,
//! never an error — only a malformed digest fails.

use thiserror::Error;

/// bcrypt cost factor for password hashing.
const BCRYPT_COST: u32 = 12;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Password hashing failed: {0}")]
    HashFailure(String),

    #[error("Invalid digest format: {0}")]
    InvalidDigestFormat(String),
}

/// Hash a plaintext password with bcrypt.
pub fn hash_password(password: &str) -> Result<String, CryptoError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| CryptoError::HashFailure(e.to_string()))
}

/// Verify a plaintext password against a stored digest.
///
/// Returns `Ok(false)` on mismatch; errors only when the stored digest
/// itself cannot be parsed.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, CryptoError> {
    bcrypt::verify(password, digest).map_err(|e| CryptoError::InvalidDigestFormat(e.to_string()))
}
