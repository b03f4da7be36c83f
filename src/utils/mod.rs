//! Shared utilities.
//!
//! - [`email`]: Outbound email (SMTP or log-only)

pub mod email;
