//! Application error type with HTTP response conversion.
//!
//! Every handler returns `Result<_, AppError>`. An [`AppError`] pairs an
//! [`ErrorKind`], which decides the status code and the machine-readable
//! `code` field, with an [`anyhow::Error`] carrying the message.
//!
//! # Response Body
//!
//! ```json
//! { "error": "Invalid email or password", "code": "unauthorized" }
//! ```
//!
//! Server-side failures (`Persistence`, `Internal`) never expose their
//! message to the client; the detail is logged instead.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Message used for every authentication failure surfaced by middleware.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
/// Message used for every authorization failure surfaced by middleware.
pub const FORBIDDEN_MESSAGE: &str = "Forbidden";
/// Message returned for login failures regardless of which check failed.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request body could not be parsed.
    BadRequest,
    /// Request body parsed but failed validation rules.
    Validation,
    /// Unique resource already exists (e.g. registration with a taken email).
    Duplicate,
    /// Missing or bad credentials or token.
    Authentication,
    /// Authenticated, but the role is not permitted.
    Authorization,
    NotFound,
    OtpExpired,
    OtpMismatch,
    /// Database unavailable or a query failed.
    Persistence,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Duplicate => StatusCode::CONFLICT,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Authorization => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::OtpExpired | Self::OtpMismatch => StatusCode::BAD_REQUEST,
            Self::Persistence | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Validation => "validation_error",
            Self::Duplicate => "duplicate_resource",
            Self::Authentication => "unauthorized",
            Self::Authorization => "forbidden",
            Self::NotFound => "not_found",
            Self::OtpExpired => "otp_expired",
            Self::OtpMismatch => "otp_mismatch",
            Self::Persistence => "persistence_error",
            Self::Internal => "internal_error",
        }
    }

    fn is_server_error(self) -> bool {
        matches!(self, Self::Persistence | Self::Internal)
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind,
            error: err.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Internal, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(ErrorKind::Internal, anyhow::anyhow!(message))
    }

    pub fn persistence<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Persistence, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::BadRequest, err)
    }

    pub fn validation(message: String) -> Self {
        Self::new(ErrorKind::Validation, anyhow::anyhow!(message))
    }

    pub fn duplicate(message: String) -> Self {
        Self::new(ErrorKind::Duplicate, anyhow::anyhow!(message))
    }

    pub fn not_found(message: String) -> Self {
        Self::new(ErrorKind::NotFound, anyhow::anyhow!(message))
    }

    /// Generic authentication failure. The cause is intentionally dropped.
    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Authentication, anyhow::anyhow!(UNAUTHORIZED_MESSAGE))
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorKind::Authentication,
            anyhow::anyhow!(INVALID_CREDENTIALS_MESSAGE),
        )
    }

    /// Generic authorization failure.
    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Authorization, anyhow::anyhow!(FORBIDDEN_MESSAGE))
    }

    pub fn otp_expired() -> Self {
        Self::new(
            ErrorKind::OtpExpired,
            anyhow::anyhow!("Verification code has expired"),
        )
    }

    pub fn otp_mismatch() -> Self {
        Self::new(
            ErrorKind::OtpMismatch,
            anyhow::anyhow!("Invalid verification code"),
        )
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.kind.is_server_error() {
            tracing::error!(code = self.kind.code(), error = ?self.error, "request failed");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(json!({
            "error": message,
            "code": self.kind.code(),
        }));

        (self.kind.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorKind::Validation.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorKind::Duplicate.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::Authentication.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::Authorization.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::OtpExpired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::OtpMismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorKind::Persistence.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_otp_kinds_have_distinct_codes() {
        assert_ne!(ErrorKind::OtpExpired.code(), ErrorKind::OtpMismatch.code());
    }

    #[tokio::test]
    async fn test_server_errors_hide_detail() {
        let err = AppError::persistence(anyhow::anyhow!("connection refused on 10.0.0.3"));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["code"], "persistence_error");
    }

    #[tokio::test]
    async fn test_client_errors_keep_message() {
        let (status, body) = body_json(AppError::duplicate("Email already registered".into())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already registered");
        assert_eq!(body["code"], "duplicate_resource");
    }

    #[tokio::test]
    async fn test_unauthorized_is_generic() {
        let (status, body) = body_json(AppError::unauthorized()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], UNAUTHORIZED_MESSAGE);
    }
}
