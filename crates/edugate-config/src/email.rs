use crate::{ConfigError, Lookup, env_lookup, parse_or, string_or};

#[derive(Clone)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@edugate.dev".to_string(),
            from_name: "EduGate".to_string(),
        }
    }
}

impl EmailConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            enabled: lookup("SMTP_ENABLED")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
            smtp_host: string_or(lookup, "SMTP_HOST", &defaults.smtp_host),
            smtp_port: parse_or(lookup, "SMTP_PORT", defaults.smtp_port)?,
            smtp_username: string_or(lookup, "SMTP_USERNAME", ""),
            smtp_password: string_or(lookup, "SMTP_PASSWORD", ""),
            from_email: string_or(lookup, "FROM_EMAIL", &defaults.from_email),
            from_name: string_or(lookup, "FROM_NAME", &defaults.from_name),
        })
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("enabled", &self.enabled)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .finish_non_exhaustive()
    }
}
