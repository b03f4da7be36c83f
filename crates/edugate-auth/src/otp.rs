//! One-time passcodes for email verification and password reset.
//!
//! Codes are numeric strings drawn from `rand::thread_rng` (a ChaCha-based
//! CSPRNG). Only the SHA-256 digest of a code is ever persisted.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

/// Wrong guesses allowed before a code is discarded.
pub const MAX_OTP_ATTEMPTS: i32 = 5;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "otp_purpose", rename_all = "snake_case")]
pub enum OtpPurpose {
    EmailVerification,
    PasswordReset,
}

/// A stored passcode. At most one exists per `(email, purpose)`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OtpRecord {
    pub email: String,
    pub purpose: OtpPurpose,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Mismatched submissions against this code so far.
    pub attempts: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpOutcome {
    Verified,
    Expired,
    Mismatch,
}

pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

pub fn hash_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.trim().as_bytes()))
}

/// Compares a submitted code against a stored record.
///
/// Expiry is checked before the code, so a correct code past its deadline
/// still yields [`OtpOutcome::Expired`].
pub fn evaluate(record: &OtpRecord, submitted: &str, now: DateTime<Utc>) -> OtpOutcome {
    if now >= record.expires_at {
        return OtpOutcome::Expired;
    }

    if hash_code(submitted) == record.code_hash {
        OtpOutcome::Verified
    } else {
        OtpOutcome::Mismatch
    }
}
