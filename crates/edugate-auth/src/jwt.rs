//! Session token issuing and verification.
//!
//! Tokens are HS256-signed JWTs carrying [`Claims`]. Verification checks the
//! signature against the server secret and rejects tokens whose `exp` has
//! elapsed, allowing `JwtConfig::leeway` seconds of clock skew.
//!
//! Every [`TokenError`] variant is collapsed into one 401 response by the
//! HTTP layer; the variants only exist so the cause can be logged.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use edugate_config::JwtConfig;

use crate::claims::Claims;
use crate::roles::Role;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("failed to encode token: {0}")]
    Encoding(String),
    #[error("token rejected: {0}")]
    Other(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            JwtErrorKind::ExpiredSignature => TokenError::Expired,
            JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
            JwtErrorKind::InvalidToken
            | JwtErrorKind::Base64(_)
            | JwtErrorKind::Json(_)
            | JwtErrorKind::Utf8(_)
            | JwtErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
            _ => TokenError::Other(err.to_string()),
        }
    }
}

/// Issues a token for `user_id` valid for `JwtConfig::token_expiry` seconds
/// from now.
pub fn issue_token(user_id: Uuid, role: Role, config: &JwtConfig) -> Result<String, TokenError> {
    issue_token_at(user_id, role, Utc::now().timestamp(), config)
}

/// Issues a token as if the current time were `issued_at` (Unix seconds).
pub fn issue_token_at(
    user_id: Uuid,
    role: Role,
    issued_at: i64,
    config: &JwtConfig,
) -> Result<String, TokenError> {
    let claims = Claims {
        sub: user_id,
        role,
        iat: issued_at,
        exp: issued_at.saturating_add(config.token_expiry),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = config.leeway;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            token_expiry: 3600,
            leeway: 0,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, Role::Instructor, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Instructor);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = test_config();
        let issued_at = Utc::now().timestamp() - 2 * config.token_expiry;

        let token = issue_token_at(Uuid::new_v4(), Role::Student, issued_at, &config).unwrap();

        assert!(matches!(
            verify_token(&token, &config),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_leeway_accepts_recently_expired_token() {
        let mut config = test_config();
        let issued_at = Utc::now().timestamp() - config.token_expiry - 30;
        let token = issue_token_at(Uuid::new_v4(), Role::Admin, issued_at, &config).unwrap();

        assert!(verify_token(&token, &config).is_err());

        config.leeway = 120;
        assert!(verify_token(&token, &config).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = test_config();
        let token = issue_token(Uuid::new_v4(), Role::Admin, &config).unwrap();

        let other = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            ..test_config()
        };

        assert!(matches!(
            verify_token(&token, &other),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let config = test_config();
        assert!(matches!(
            verify_token("not-a-token", &config),
            Err(TokenError::Malformed)
        ));
        assert!(verify_token("", &config).is_err());
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let config = test_config();
        let token = issue_token(Uuid::new_v4(), Role::Student, &config).unwrap();
        let admin = issue_token(Uuid::new_v4(), Role::Admin, &config).unwrap();

        // Splice the admin payload onto the student signature.
        let parts: Vec<&str> = token.split('.').collect();
        let admin_parts: Vec<&str> = admin.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], admin_parts[1], parts[2]);

        assert!(verify_token(&forged, &config).is_err());
    }
}
