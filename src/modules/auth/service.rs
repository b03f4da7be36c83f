use chrono::{Duration, Utc};
use edugate_auth::{
    MAX_OTP_ATTEMPTS, OtpOutcome, OtpPurpose, OtpRecord, evaluate, generate_code, hash_code,
    issue_token,
};
use edugate_core::{AppError, hash_password_with_cost, verify_password};
use edugate_models::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, NewUser, RegisterRequest,
    ResendOtpRequest, ResetPasswordRequest, User, VerifyOtpRequest, normalize_email,
};
use tracing::instrument;

use crate::state::AppState;
use crate::utils::email::otp_email;

pub const VERIFICATION_SENT_MESSAGE: &str =
    "If the account exists and is unverified, a verification code has been sent";
pub const RESET_SENT_MESSAGE: &str =
    "If the account exists, a password reset code has been sent";

pub struct AuthService;

impl AuthService {
    /// Creates an unverified account and emails a verification code.
    ///
    /// A failed email send is logged and does not undo the registration; the
    /// user can ask for a new code through `resend-otp`.
    #[instrument(skip(state, dto), fields(role = %dto.role))]
    pub async fn register(state: &AppState, dto: RegisterRequest) -> Result<User, AppError> {
        let email = normalize_email(&dto.email);
        let password_hash =
            hash_password_with_cost(&dto.password, state.password_config.bcrypt_cost)?;

        let user = state
            .db
            .create_user(NewUser {
                email: email.clone(),
                password_hash,
                role: dto.role,
                is_verified: false,
                first_name: dto.first_name,
                last_name: dto.last_name,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");

        if let Err(err) = Self::issue_otp(state, &email, OtpPurpose::EmailVerification).await {
            tracing::warn!(user_id = %user.id, error = %err, "failed to send verification code");
        }

        Ok(user.into())
    }

    /// Every failure returns the same 401 so callers cannot tell which
    /// check failed.
    #[instrument(skip(state, dto))]
    pub async fn login(state: &AppState, dto: LoginRequest) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&dto.email);

        let Some(user) = state.db.find_user_by_email(&email).await? else {
            // Spend the same bcrypt time as a real password check.
            hash_password_with_cost(&dto.password, state.password_config.bcrypt_cost)?;
            tracing::debug!("login rejected: unknown email");
            return Err(AppError::invalid_credentials());
        };

        if !verify_password(&dto.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(AppError::invalid_credentials());
        }

        if !user.is_verified {
            tracing::debug!(user_id = %user.id, "login rejected: email not verified");
            return Err(AppError::invalid_credentials());
        }

        let access_token =
            issue_token(user.id, user.role, &state.jwt_config).map_err(AppError::internal)?;

        tracing::info!(user_id = %user.id, role = %user.role, "user logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_config.token_expiry,
            user: user.into(),
        })
    }

    #[instrument(skip(state, dto))]
    pub async fn verify_email(
        state: &AppState,
        dto: VerifyOtpRequest,
    ) -> Result<MessageResponse, AppError> {
        let email = normalize_email(&dto.email);

        Self::consume_otp(state, &email, OtpPurpose::EmailVerification, &dto.code).await?;

        let user = state
            .db
            .find_user_by_email(&email)
            .await?
            .ok_or_else(AppError::otp_mismatch)?;
        state.db.mark_user_verified(user.id).await?;

        tracing::info!(user_id = %user.id, "email verified");
        Ok(MessageResponse::new("Email verified successfully"))
    }

    /// Responds identically whether or not the account exists.
    #[instrument(skip(state, dto))]
    pub async fn resend_verification(
        state: &AppState,
        dto: ResendOtpRequest,
    ) -> Result<MessageResponse, AppError> {
        let email = normalize_email(&dto.email);

        match state.db.find_user_by_email(&email).await? {
            Some(user) if !user.is_verified => {
                if let Err(err) =
                    Self::issue_otp(state, &email, OtpPurpose::EmailVerification).await
                {
                    tracing::warn!(user_id = %user.id, error = %err, "failed to resend verification code");
                }
            }
            _ => tracing::debug!("resend skipped: no unverified account"),
        }

        Ok(MessageResponse::new(VERIFICATION_SENT_MESSAGE))
    }

    /// Responds identically whether or not the account exists.
    #[instrument(skip(state, dto))]
    pub async fn forgot_password(
        state: &AppState,
        dto: ForgotPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        let email = normalize_email(&dto.email);

        if let Some(user) = state.db.find_user_by_email(&email).await? {
            if let Err(err) = Self::issue_otp(state, &email, OtpPurpose::PasswordReset).await {
                tracing::warn!(user_id = %user.id, error = %err, "failed to send reset code");
            }
        }

        Ok(MessageResponse::new(RESET_SENT_MESSAGE))
    }

    #[instrument(skip(state, dto))]
    pub async fn reset_password(
        state: &AppState,
        dto: ResetPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        let email = normalize_email(&dto.email);

        let user = state
            .db
            .find_user_by_email(&email)
            .await?
            .ok_or_else(AppError::otp_mismatch)?;

        Self::consume_otp(state, &email, OtpPurpose::PasswordReset, &dto.code).await?;

        let password_hash =
            hash_password_with_cost(&dto.new_password, state.password_config.bcrypt_cost)?;
        state.db.update_password(user.id, &password_hash).await?;

        tracing::info!(user_id = %user.id, "password reset");
        Ok(MessageResponse::new("Password has been reset successfully"))
    }

    /// Generates a code, stores its digest (replacing any earlier code for
    /// the same purpose) and emails it.
    pub(crate) async fn issue_otp(
        state: &AppState,
        email: &str,
        purpose: OtpPurpose,
    ) -> Result<(), AppError> {
        let code = generate_code(state.otp_config.length);
        let now = Utc::now();

        state
            .db
            .upsert_otp(OtpRecord {
                email: email.to_string(),
                purpose,
                code_hash: hash_code(&code),
                expires_at: now + Duration::seconds(state.otp_config.expiry_seconds),
                created_at: now,
                attempts: 0,
            })
            .await?;

        state
            .mailer
            .send(otp_email(
                email,
                &code,
                purpose,
                state.otp_config.expiry_minutes(),
            ))
            .await
    }

    /// Checks a submitted code. Verified and expired records are deleted. A
    /// mismatch keeps the record until [`MAX_OTP_ATTEMPTS`] wrong guesses.
    async fn consume_otp(
        state: &AppState,
        email: &str,
        purpose: OtpPurpose,
        submitted: &str,
    ) -> Result<(), AppError> {
        let Some(record) = state.db.find_otp(email, purpose).await? else {
            return Err(AppError::otp_mismatch());
        };

        match evaluate(&record, submitted, Utc::now()) {
            OtpOutcome::Verified => {
                state.db.delete_otp(email, purpose).await?;
                Ok(())
            }
            OtpOutcome::Expired => {
                state.db.delete_otp(email, purpose).await?;
                Err(AppError::otp_expired())
            }
            OtpOutcome::Mismatch => {
                let attempts = state.db.record_otp_failure(email, purpose).await?;
                if attempts.is_some_and(|n| n >= MAX_OTP_ATTEMPTS) {
                    tracing::warn!(?purpose, "passcode discarded after too many wrong guesses");
                    state.db.delete_otp(email, purpose).await?;
                }
                Err(AppError::otp_mismatch())
            }
        }
    }
}
