//! # EduGate Core
//!
//! Core types, errors, and utilities for the EduGate API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination parameters and response metadata
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use edugate_core::{AppError, hash_password, verify_password};
//!
//! let digest = hash_password("secret123")?;
//! if !verify_password("secret123", &digest)? {
//!     return Err(AppError::invalid_credentials());
//! }
//! ```

pub mod errors;
pub mod pagination;
pub mod password;

pub use errors::{AppError, ErrorKind};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, hash_password_with_cost, verify_password};
