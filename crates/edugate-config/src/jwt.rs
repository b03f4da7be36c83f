use crate::{ConfigError, Lookup, env_lookup, parse_or, required};

/// Default session token lifetime: 24 hours.
pub const DEFAULT_TOKEN_EXPIRY: i64 = 86_400;

/// Longest accepted session token lifetime: 30 days.
pub const MAX_TOKEN_EXPIRY: i64 = 30 * 86_400;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub token_expiry: i64,
    /// Clock skew tolerated when checking `exp`, in seconds.
    pub leeway: u64,
}

impl JwtConfig {
    /// Fails when `JWT_SECRET` is missing or blank; the server must not start
    /// with a guessable signing key.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let token_expiry = parse_or(lookup, "JWT_EXPIRY_SECONDS", DEFAULT_TOKEN_EXPIRY)?;
        if !(1..=MAX_TOKEN_EXPIRY).contains(&token_expiry) {
            return Err(ConfigError::Invalid {
                var: "JWT_EXPIRY_SECONDS",
                value: token_expiry.to_string(),
            });
        }

        Ok(Self {
            secret: required(lookup, "JWT_SECRET")?,
            token_expiry,
            leeway: parse_or(lookup, "JWT_LEEWAY_SECONDS", 0)?,
        })
    }
}

// Keeps the secret out of logs and `#[instrument]` spans.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .field("leeway", &self.leeway)
            .finish()
    }
}
