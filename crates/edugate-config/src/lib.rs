//! # EduGate Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: Token signing secret and lifetimes
//! - [`otp`]: One-time passcode length and expiry
//! - [`password`]: bcrypt work factor
//! - [`server`]: Bind address
//! - [`database`]: PostgreSQL connection settings
//! - [`email`]: SMTP delivery
//! - [`cors`]: Allowed origins
//!
//! Every config type has a `from_env()` constructor and a `from_lookup()`
//! constructor taking a key lookup function, which keeps tests away from the
//! process environment.
//!
//! # Example
//!
//! ```ignore
//! use edugate_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?; // fails when JWT_SECRET is missing
//! ```

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod otp;
pub mod password;
pub mod server;

use std::str::FromStr;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use otp::OtpConfig;
pub use password::PasswordConfig;
pub use server::ServerConfig;

/// Key lookup used by every `from_lookup` constructor.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Reads a required, non-blank variable.
pub(crate) fn required(lookup: Lookup<'_>, var: &'static str) -> Result<String, ConfigError> {
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(var))
}

/// Reads an optional variable, rejecting values that fail to parse.
pub(crate) fn parse_or<T: FromStr>(
    lookup: Lookup<'_>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var).map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { var, value: v }),
        None => Ok(default),
    }
}

pub(crate) fn string_or(lookup: Lookup<'_>, var: &'static str, default: &str) -> String {
    lookup(var).unwrap_or_else(|| default.to_string())
}

/// Complete process configuration. Built once at startup and handed to
/// the application state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub otp: OtpConfig,
    pub password: PasswordConfig,
    pub email: EmailConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_lookup(lookup)?,
            database: DatabaseConfig::from_lookup(lookup)?,
            jwt: JwtConfig::from_lookup(lookup)?,
            otp: OtpConfig::from_lookup(lookup)?,
            password: PasswordConfig::from_lookup(lookup)?,
            email: EmailConfig::from_lookup(lookup)?,
            cors: CorsConfig::from_lookup(lookup),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    pub fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }
}
