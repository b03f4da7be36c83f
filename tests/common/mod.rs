#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use edugate::edugate_auth::Role;
use edugate::edugate_config::AppConfig;
use edugate::edugate_core::AppError;
use edugate::edugate_db::MemoryStore;
use edugate::router::init_router;
use edugate::state::AppState;
use edugate::utils::email::{Mailer, OutgoingEmail};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "password123";

const CODE_MARKER: &str = "Your verification code is: ";

pub fn test_config() -> AppConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "postgres://unused/edugate"),
        ("JWT_SECRET", TEST_SECRET),
        ("BCRYPT_COST", "4"),
    ]);
    let lookup = move |key: &str| vars.get(key).map(|v| v.to_string());
    AppConfig::from_lookup(&lookup).expect("test config")
}

/// Captures outgoing mail so tests can read the codes.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn sent_to(&self, to: &str) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.to == to)
            .cloned()
            .collect()
    }

    /// Most recent code mailed to `to`.
    pub fn last_code(&self, to: &str) -> Option<String> {
        self.sent_to(to).last().and_then(|mail| {
            let start = mail.text_body.find(CODE_MARKER)? + CODE_MARKER.len();
            let code: String = mail.text_body[start..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            Some(code)
        })
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Mailer that always fails, for checking that delivery errors are not fatal.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: OutgoingEmail) -> Result<(), AppError> {
        Err(AppError::internal_error("smtp unreachable".to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(&test_config(), store.clone()).with_mailer(mailer.clone());
    let router = init_router(state.clone()).expect("route table");

    TestApp {
        router,
        state,
        store,
        mailer,
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn register(&self, email: &str, role: Role) -> (StatusCode, Value) {
        self.post(
            "/api/auth/register",
            None,
            json!({ "email": email, "password": TEST_PASSWORD, "role": role.as_str() }),
        )
        .await
    }

    pub async fn verify(&self, email: &str, code: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/verify-otp",
            None,
            json!({ "email": email, "code": code }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/login",
            None,
            json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Registers, verifies and logs in a fresh account.
    pub async fn signed_in(&self, role: Role) -> TestUser {
        let email = unique_email();

        let (status, body) = self.register(&email, role).await;
        assert_eq!(status, StatusCode::CREATED, "register: {body}");

        let code = self.mailer.last_code(&email).expect("verification code");
        let (status, body) = self.verify(&email, &code).await;
        assert_eq!(status, StatusCode::OK, "verify: {body}");

        let (status, body) = self.login(&email, TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login: {body}");

        TestUser {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            email,
            token: body["access_token"].as_str().unwrap().to_string(),
        }
    }
}

pub fn unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}
