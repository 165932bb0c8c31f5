//! Common test utilities for integration tests
//!
//! [`TestApp`] serves the full router over the in-memory credential store,
//! so these tests need no database.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use cointelligence_backend::{
    config::AppConfig,
    repositories::{CredentialStore, InMemoryCredentialStore},
    routes,
    state::AppState,
};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryCredentialStore>,
}

/// Response status, headers and parsed JSON body (Null when not JSON)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: header::HeaderMap,
    pub body: Value,
    pub text: String,
}

impl TestApp {
    /// Create a new test application backed by a fresh in-memory store
    pub fn new() -> Self {
        let store = Arc::new(InMemoryCredentialStore::new());
        let state = AppState::new(store.clone(), test_config()).expect("valid test config");
        let app = routes::create_router(state);

        Self { app, store }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }

    fn request(method: &str, path: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Self::request("GET", path, None, None)).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        self.send(Self::request("POST", path, None, Some(body))).await
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, path: &str, token: &str) -> TestResponse {
        self.send(Self::request("GET", path, Some(token), None)).await
    }

    /// Make an authenticated POST request without a body
    pub async fn post_auth(&self, path: &str, token: &str) -> TestResponse {
        self.send(Self::request("POST", path, Some(token), None)).await
    }

    /// Register a user and return the issued access token
    pub async fn register(&self, username: &str, email: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/v1/auth/register",
                &registration(username, email, password),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);

        response.body["token"]["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Soft-delete a user by username
    pub async fn deactivate(&self, username: &str) {
        let user = self.store.find_by_username(username).await.unwrap().unwrap();
        assert!(self.store.deactivate(user.id).await.unwrap());
    }
}

/// Registration payload with a fixed display name
pub fn registration(username: &str, email: &str, password: &str) -> Value {
    json!({
        "name": "Jane Doe",
        "email": email,
        "username": username,
        "password": password,
    })
}

/// Registration payload with a random name and email.
///
/// `seq` keeps usernames and emails unique within one test.
pub fn fake_registration(seq: usize) -> Value {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();

    json!({
        "name": name,
        "email": format!("u{}.{}", seq, email),
        "username": format!("user{}", seq),
        "password": "secret1",
    })
}

/// Get test configuration
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = "memory://test".to_string();
    config.jwt.secret = "test-secret-key-for-integration-tests-32".to_string();
    config.password.bcrypt_cost = 4;
    config
}
