mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{FailingMailer, TEST_PASSWORD, test_app, unique_email};
use edugate::edugate_auth::{
    MAX_OTP_ATTEMPTS, OtpPurpose, OtpRecord, Role, hash_code, verify_token,
};
use edugate::edugate_db::{OtpStore, UserStore};
use edugate::router::init_router;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_register_verify_login_for_every_role() {
    let app = test_app();

    for role in Role::ALL {
        let user = app.signed_in(role).await;
        let claims = verify_token(&user.token, &app.state.jwt_config).unwrap();

        assert_eq!(claims.role, role);
        assert_eq!(claims.sub, user.id);
    }
}

#[tokio::test]
async fn test_register_returns_unverified_user_without_hash() {
    let app = test_app();
    let email = unique_email();

    let (status, body) = app.register(&email, Role::Student).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "student");
    assert_eq!(body["is_verified"], false);
    assert!(body.get("password_hash").is_none());
    assert_eq!(app.mailer.sent_to(&email).len(), 1);
}

#[tokio::test]
async fn test_register_normalizes_email() {
    let app = test_app();

    let (status, body) = app.register("  Mixed.Case@Test.COM ", Role::Student).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "mixed.case@test.com");
    assert!(app.mailer.last_code("mixed.case@test.com").is_some());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts_and_keeps_first_record() {
    let app = test_app();
    let email = unique_email();

    let (status, first) = app.register(&email, Role::Instructor).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.register(&email.to_uppercase(), Role::Admin).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "duplicate_resource");

    let stored = app.store.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(stored.id.to_string(), first["id"].as_str().unwrap());
    assert_eq!(stored.role, Role::Instructor);
    assert_eq!(app.store.user_count().await, 1);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = test_app();

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "not-an-email", "password": TEST_PASSWORD, "role": "student" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": unique_email(), "password": "short", "role": "student" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": unique_email(), "password": TEST_PASSWORD, "role": "janitor" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": unique_email(), "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "role is required");

    assert_eq!(app.store.user_count().await, 0);
}

#[tokio::test]
async fn test_register_survives_mail_failure() {
    let app = test_app();
    let state = app.state.clone().with_mailer(Arc::new(FailingMailer));
    let router = init_router(state).unwrap();
    let app = common::TestApp { router, ..app };
    let email = unique_email();

    let (status, _) = app.register(&email, Role::Student).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(app.store.find_otp(&email, OtpPurpose::EmailVerification).await.unwrap().is_some());
}

#[tokio::test]
async fn test_login_requires_verified_email() {
    let app = test_app();
    let email = unique_email();
    app.register(&email, Role::Student).await;

    let (status, body) = app.login(&email, TEST_PASSWORD).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test_app();
    let user = app.signed_in(Role::Student).await;

    let (wrong_status, wrong_body) = app.login(&user.email, "wrong-password").await;
    let (unknown_status, unknown_body) = app.login(&unique_email(), TEST_PASSWORD).await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_unknown_email_login_matches_unverified_account() {
    let app = test_app();
    let unverified = unique_email();
    app.register(&unverified, Role::Student).await;

    let (unverified_status, unverified_body) = app.login(&unverified, TEST_PASSWORD).await;
    let (unknown_status, unknown_body) = app.login(&unique_email(), TEST_PASSWORD).await;

    assert_eq!(unverified_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unverified_body, unknown_body);
}

#[tokio::test]
async fn test_login_response_shape() {
    let app = test_app();
    let user = app.signed_in(Role::Instructor).await;

    let (status, body) = app.login(&user.email, TEST_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], app.state.jwt_config.token_expiry);
    assert_eq!(body["user"]["role"], "instructor");
    assert_eq!(body["user"]["is_verified"], true);
}

#[tokio::test]
async fn test_verify_with_wrong_code_is_mismatch_and_keeps_code() {
    let app = test_app();
    let email = unique_email();
    app.register(&email, Role::Student).await;
    let code = app.mailer.last_code(&email).unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let (status, body) = app.verify(&email, wrong).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "otp_mismatch");

    let (status, _) = app.verify(&email, &code).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_code_is_rejected_even_when_it_matches() {
    let app = test_app();
    let email = unique_email();
    app.register(&email, Role::Student).await;

    let now = Utc::now();
    app.store
        .upsert_otp(OtpRecord {
            email: email.clone(),
            purpose: OtpPurpose::EmailVerification,
            code_hash: hash_code("424242"),
            expires_at: now - Duration::seconds(1),
            created_at: now - Duration::minutes(11),
            attempts: 0,
        })
        .await
        .unwrap();

    let (status, body) = app.verify(&email, "424242").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "otp_expired");

    let user = app.store.find_user_by_email(&email).await.unwrap().unwrap();
    assert!(!user.is_verified);
    assert!(app.store.find_otp(&email, OtpPurpose::EmailVerification).await.unwrap().is_none());
}

#[tokio::test]
async fn test_code_is_single_use() {
    let app = test_app();
    let email = unique_email();
    app.register(&email, Role::Student).await;
    let code = app.mailer.last_code(&email).unwrap();

    assert_eq!(app.verify(&email, &code).await.0, StatusCode::OK);

    let (status, body) = app.verify(&email, &code).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "otp_mismatch");
}

#[tokio::test]
async fn test_resend_replaces_previous_code() {
    let app = test_app();
    let email = unique_email();
    app.register(&email, Role::Student).await;
    let first = app.mailer.last_code(&email).unwrap();

    let (status, _) = app
        .post("/api/auth/resend-otp", None, json!({ "email": email }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.mailer.sent_to(&email).len(), 2);

    let second = app.mailer.last_code(&email).unwrap();
    if first != second {
        assert_eq!(app.verify(&email, &first).await.0, StatusCode::BAD_REQUEST);
    }
    assert_eq!(app.verify(&email, &second).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_resend_does_not_reveal_accounts() {
    let app = test_app();
    let verified = app.signed_in(Role::Student).await;
    let sent_before = app.mailer.sent_to(&verified.email).len();

    let (unknown_status, unknown_body) = app
        .post("/api/auth/resend-otp", None, json!({ "email": unique_email() }))
        .await;
    let (verified_status, verified_body) = app
        .post("/api/auth/resend-otp", None, json!({ "email": verified.email }))
        .await;

    assert_eq!(unknown_status, StatusCode::OK);
    assert_eq!(verified_status, StatusCode::OK);
    assert_eq!(unknown_body, verified_body);
    assert_eq!(app.mailer.sent_to(&verified.email).len(), sent_before);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = test_app();
    let user = app.signed_in(Role::Student).await;

    let (status, _) = app
        .post("/api/auth/forgot-password", None, json!({ "email": user.email }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let code = app.mailer.last_code(&user.email).unwrap();

    let (status, _) = app
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "email": user.email, "code": code, "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.login(&user.email, TEST_PASSWORD).await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(app.login(&user.email, "brand-new-pass").await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_reset_code_is_discarded_after_repeated_wrong_guesses() {
    let app = test_app();
    let user = app.signed_in(Role::Student).await;
    app.post("/api/auth/forgot-password", None, json!({ "email": user.email }))
        .await;
    let code = app.mailer.last_code(&user.email).unwrap();

    let wrong_codes = (0..)
        .map(|n| format!("{n:06}"))
        .filter(|guess| *guess != code)
        .take(MAX_OTP_ATTEMPTS as usize);
    for guess in wrong_codes {
        let (status, body) = app
            .post(
                "/api/auth/reset-password",
                None,
                json!({ "email": user.email, "code": guess, "new_password": "brand-new-pass" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "otp_mismatch");
    }
    assert!(app.store.find_otp(&user.email, OtpPurpose::PasswordReset).await.unwrap().is_none());

    let (status, body) = app
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "email": user.email, "code": code, "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "otp_mismatch");
    assert_eq!(app.login(&user.email, TEST_PASSWORD).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_guesses_below_limit_keep_code_usable() {
    let app = test_app();
    let email = unique_email();
    app.register(&email, Role::Student).await;
    let code = app.mailer.last_code(&email).unwrap();

    let wrong_codes = (0..)
        .map(|n| format!("{n:06}"))
        .filter(|guess| *guess != code)
        .take(MAX_OTP_ATTEMPTS as usize - 1);
    for guess in wrong_codes {
        assert_eq!(app.verify(&email, &guess).await.0, StatusCode::BAD_REQUEST);
    }
    let record = app.store.find_otp(&email, OtpPurpose::EmailVerification).await.unwrap().unwrap();
    assert_eq!(record.attempts, MAX_OTP_ATTEMPTS - 1);

    assert_eq!(app.verify(&email, &code).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_verification_code_cannot_reset_password() {
    let app = test_app();
    let email = unique_email();
    app.register(&email, Role::Student).await;
    let code = app.mailer.last_code(&email).unwrap();

    let (status, body) = app
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "email": email, "code": code, "new_password": "brand-new-pass" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "otp_mismatch");
}
