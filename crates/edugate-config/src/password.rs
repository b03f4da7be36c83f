use crate::{ConfigError, Lookup, env_lookup, parse_or};

/// bcrypt's default work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

#[derive(Clone, Debug)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let cost: u32 = parse_or(lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        Ok(Self {
            bcrypt_cost: cost.clamp(4, 31),
        })
    }
}
