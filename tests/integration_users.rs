mod common;

use axum::http::StatusCode;
use common::{TEST_PASSWORD, test_app};
use edugate::edugate_auth::{OtpPurpose, Role};
use edugate::edugate_db::OtpStore;
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::FirstName;
use serde_json::json;

#[tokio::test]
async fn test_profile_roundtrip() {
    let app = test_app();
    let user = app.signed_in(Role::Student).await;

    let (status, profile) = app.get("/api/users/me", Some(&user.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], user.email);
    assert!(profile.get("password_hash").is_none());

    let first_name: String = FirstName().fake();
    let bio: String = Sentence(3..8).fake();
    let (status, updated) = app
        .request(
            "PUT",
            "/api/users/me",
            Some(&user.token),
            Some(json!({ "first_name": first_name, "bio": bio })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["first_name"], first_name);
    assert_eq!(updated["bio"], bio);
    assert_eq!(updated["role"], "student");
}

#[tokio::test]
async fn test_profile_update_cannot_change_role() {
    let app = test_app();
    let user = app.signed_in(Role::Student).await;

    let (status, updated) = app
        .request(
            "PUT",
            "/api/users/me",
            Some(&user.token),
            Some(json!({ "last_name": "Hopper", "role": "admin" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "student");
}

#[tokio::test]
async fn test_change_password() {
    let app = test_app();
    let user = app.signed_in(Role::Instructor).await;

    let (status, body) = app
        .post(
            "/api/users/me/password",
            Some(&user.token),
            json!({ "current_password": "not-my-password", "new_password": "another-pass-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Current password is incorrect");

    let (status, _) = app
        .post(
            "/api/users/me/password",
            Some(&user.token),
            json!({ "current_password": TEST_PASSWORD, "new_password": "another-pass-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.login(&user.email, TEST_PASSWORD).await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(app.login(&user.email, "another-pass-1").await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_lists_and_fetches_users() {
    let app = test_app();
    let admin = app.signed_in(Role::Admin).await;
    let student = app.signed_in(Role::Student).await;

    let (status, page) = app.get("/api/users?limit=10", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["meta"]["total"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);

    let (status, fetched) = app
        .get(&format!("/api/users/{}", student.id), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["email"], student.email);

    let (status, _) = app
        .get(&format!("/api/users/{}", admin.id), Some(&student.token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_deletes_user() {
    let app = test_app();
    let admin = app.signed_in(Role::Admin).await;
    let student = app.signed_in(Role::Student).await;
    let uri = format!("/api/users/{}", student.id);

    let (status, _) = app.request("DELETE", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.request("DELETE", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.login(&student.email, TEST_PASSWORD).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deleting_user_discards_their_passcodes() {
    let app = test_app();
    let admin = app.signed_in(Role::Admin).await;
    let student = app.signed_in(Role::Student).await;
    app.post("/api/auth/forgot-password", None, json!({ "email": student.email }))
        .await;
    let code = app.mailer.last_code(&student.email).unwrap();

    let (status, _) = app
        .request("DELETE", &format!("/api/users/{}", student.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.store.find_otp(&student.email, OtpPurpose::PasswordReset).await.unwrap().is_none());

    // A new account under the same address must not inherit the old code.
    app.register(&student.email, Role::Student).await;
    let (status, body) = app
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "email": student.email, "code": code, "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "otp_mismatch");
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = test_app();
    let admin = app.signed_in(Role::Admin).await;

    let (status, body) = app
        .request("DELETE", &format!("/api/users/{}", admin.id), Some(&admin.token), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}
