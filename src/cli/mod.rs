//! Operator commands run outside the HTTP server.

use edugate_auth::Role;
use edugate_core::{AppError, hash_password_with_cost};
use edugate_db::Database;
use edugate_models::{NewUser, User, normalize_email};
use validator::ValidateEmail;

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub struct AdminAccount<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Creates an admin whose email is already verified, so the account can log
/// in without an OTP round trip.
pub async fn create_admin(
    db: &dyn Database,
    account: AdminAccount<'_>,
    bcrypt_cost: u32,
) -> Result<User, AppError> {
    let email = normalize_email(account.email);
    if !email.validate_email() {
        return Err(AppError::validation("email: must be a valid email address".to_string()));
    }
    if account.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "password: must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password_with_cost(account.password, bcrypt_cost)?;
    let record = db
        .create_user(NewUser {
            email,
            password_hash,
            role: Role::Admin,
            is_verified: true,
            first_name: account.first_name,
            last_name: account.last_name,
        })
        .await?;

    tracing::info!(user_id = %record.id, "admin account created");
    Ok(record.into())
}
