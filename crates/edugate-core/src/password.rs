//! Password hashing with bcrypt.
//!
//! Each call to [`hash_password`] generates a fresh salt, so hashing the same
//! plaintext twice yields different digests. Verification is delegated to
//! bcrypt, which compares in constant time.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Hashes with an explicit work factor. Lower costs are only meant for tests.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

/// Returns `Ok(false)` on mismatch. An unreadable digest is an internal error.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    verify(password, digest)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}
