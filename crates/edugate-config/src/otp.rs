use crate::{ConfigError, Lookup, env_lookup, parse_or};

/// Longest accepted passcode lifetime: 24 hours.
pub const MAX_OTP_EXPIRY_SECONDS: i64 = 86_400;

#[derive(Clone, Debug)]
pub struct OtpConfig {
    /// Number of digits in a generated code.
    pub length: usize,
    /// Code lifetime in seconds.
    pub expiry_seconds: i64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            length: 6,
            expiry_seconds: 600,
        }
    }
}

impl OtpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let length: usize = parse_or(lookup, "OTP_LENGTH", defaults.length)?;
        let expiry_seconds = parse_or(lookup, "OTP_EXPIRY_SECONDS", defaults.expiry_seconds)?;
        if expiry_seconds > MAX_OTP_EXPIRY_SECONDS {
            return Err(ConfigError::Invalid {
                var: "OTP_EXPIRY_SECONDS",
                value: expiry_seconds.to_string(),
            });
        }

        Ok(Self {
            length: length.clamp(4, 10),
            expiry_seconds: expiry_seconds.max(1),
        })
    }

    pub fn expiry_minutes(&self) -> i64 {
        (self.expiry_seconds + 59) / 60
    }
}
