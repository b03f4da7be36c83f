use std::sync::Arc;

use edugate_config::{AppConfig, CorsConfig, JwtConfig, OtpConfig, PasswordConfig};
use edugate_db::Database;

use crate::utils::email::{Mailer, mailer_from_config};

/// Shared per-process state. Everything here is immutable configuration or an
/// `Arc` handle, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub mailer: Arc<dyn Mailer>,
    pub jwt_config: JwtConfig,
    pub otp_config: OtpConfig,
    pub password_config: PasswordConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(config: &AppConfig, db: Arc<dyn Database>) -> Self {
        Self {
            db,
            mailer: mailer_from_config(&config.email),
            jwt_config: config.jwt.clone(),
            otp_config: config.otp.clone(),
            password_config: config.password.clone(),
            cors_config: config.cors.clone(),
        }
    }

    /// Replaces the mailer. Tests use this to capture outgoing codes.
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }
}
