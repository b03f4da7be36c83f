//! # EduGate Auth
//!
//! Authentication primitives for the EduGate API.
//!
//! - [`roles`]: The closed set of user roles
//! - [`claims`]: Session token claims
//! - [`jwt`]: Token issuing and verification
//! - [`otp`]: One-time passcode generation and evaluation
//!
//! # Example
//!
//! ```ignore
//! use edugate_auth::{Role, issue_token, verify_token};
//! use edugate_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let token = issue_token(user_id, Role::Student, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, Role::Student);
//! ```

pub mod claims;
pub mod jwt;
pub mod otp;
pub mod roles;

pub use claims::Claims;
pub use jwt::{TokenError, issue_token, issue_token_at, verify_token};
pub use otp::{
    MAX_OTP_ATTEMPTS, OtpOutcome, OtpPurpose, OtpRecord, evaluate, generate_code, hash_code,
};
pub use roles::{ParseRoleError, Role};
