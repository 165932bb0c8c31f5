//! Integration tests for the authentication endpoints

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{fake_registration, registration, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_returns_created_user_and_token() {
    let app = common::TestApp::new();

    let response = app
        .post(
            "/api/v1/auth/register",
            &registration("jane123", "jane@x.com", "secret1"),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = &response.body;
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["user"]["username"], "jane123");
    assert_eq!(body["user"]["name"], "Jane Doe");
    assert_eq!(body["user"]["is_active"], true);
    assert_eq!(body["user"]["email_verified"], false);
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["token"]["token_type"], "bearer");
    assert_eq!(body["token"]["expires_in"], 1800);
    assert!(!body["token"]["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_username_rejected() {
    let app = TestApp::new();
    app.register("jane123", "jane@x.com", "secret1").await;

    let response = app
        .post(
            "/api/v1/auth/register",
            &registration("jane123", "other@x.com", "secret1"),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "DUPLICATE_USERNAME");
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let app = TestApp::new();
    app.register("jane123", "jane@x.com", "secret1").await;

    let response = app
        .post(
            "/api/v1/auth/register",
            &registration("jane456", "JANE@x.com", "secret1"),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_register_validation_errors_name_the_field() {
    let app = TestApp::new();

    let cases = [
        (registration("jane123", "not-an-email", "secret1"), "email"),
        (registration("ja", "jane@x.com", "secret1"), "username"),
        (registration("jane_123", "jane@x.com", "secret1"), "username"),
        (registration("jane123", "jane@x.com", "short"), "password"),
    ];

    for (payload, field) in cases {
        let response = app.post("/api/v1/auth/register", &payload).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", payload);
        assert_eq!(response.body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(response.body["error"]["field"], field);
    }
}

#[tokio::test]
async fn test_register_blank_name_rejected() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/auth/register",
            &json!({
                "name": "   ",
                "email": "jane@x.com",
                "username": "jane123",
                "password": "secret1",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["field"], "name");
}

#[tokio::test]
async fn test_login_succeeds_with_any_username_case() {
    let app = TestApp::new();
    app.register("Alice1", "alice@x.com", "secret1").await;

    let response = app
        .post(
            "/api/v1/auth/login",
            &json!({"username": "alice1", "password": "secret1"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful");
    assert_eq!(response.body["user"]["username"], "alice1");
    assert_eq!(response.body["token"]["token_type"], "bearer");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register("jane123", "jane@x.com", "secret1").await;

    let wrong_password = app
        .post(
            "/api/v1/auth/login",
            &json!({"username": "jane123", "password": "wrong"}),
        )
        .await;
    let unknown_user = app
        .post(
            "/api/v1/auth/login",
            &json!({"username": "nobody", "password": "secret1"}),
        )
        .await;

    for response in [&wrong_password, &unknown_user] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(response.body["error"]["code"], "INVALID_CREDENTIALS");
    }
    assert_eq!(wrong_password.text, unknown_user.text);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = TestApp::new();
    let token = app.register("jane123", "jane@x.com", "secret1").await;

    let response = app.get_auth("/api/v1/auth/me", &token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "jane123");
    assert_eq!(response.body["email"], "jane@x.com");
}

#[tokio::test]
async fn test_logout_acknowledges_without_revoking() {
    let app = TestApp::new();
    let token = app.register("jane123", "jane@x.com", "secret1").await;

    let response = app.post_auth("/api/v1/auth/logout", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Logout successful");

    // Stateless tokens stay valid until they expire
    let me = app.get_auth("/api/v1/auth/me", &token).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_issues_a_new_working_token() {
    let app = TestApp::new();
    let token = app.register("jane123", "jane@x.com", "secret1").await;

    let response = app.post_auth("/api/v1/auth/refresh", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "bearer");

    let refreshed = response.body["access_token"].as_str().unwrap();
    assert_ne!(refreshed, token);

    let me = app.get_auth("/api/v1/auth/me", refreshed).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "jane123");
}

#[tokio::test]
async fn test_deactivated_user_locked_out() {
    let app = TestApp::new();
    let token = app.register("jane123", "jane@x.com", "secret1").await;
    app.deactivate("jane123").await;

    let me = app.get_auth("/api/v1/auth/me", &token).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let login = app
        .post(
            "/api/v1/auth/login",
            &json!({"username": "jane123", "password": "secret1"}),
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_field_is_a_validation_error() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/auth/register",
            &json!({"name": "Jane Doe", "email": "jane@x.com", "username": "jane123"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(response.body["error"]["field"], "password");

    let response = app
        .post("/api/v1/auth/login", &json!({"username": "jane123"}))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["field"], "password");
}

#[tokio::test]
async fn test_mistyped_field_is_a_validation_error() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/auth/register",
            &json!({"name": "Jane Doe", "email": "jane@x.com", "username": "jane123", "password": 123456}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unparseable_body_is_a_validation_error() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "body");
}

#[tokio::test]
async fn test_overlong_name_and_username_rejected() {
    let app = TestApp::new();

    let mut long_name = registration("jane123", "jane@x.com", "secret1");
    long_name["name"] = json!("J".repeat(101));
    let response = app.post("/api/v1/auth/register", &long_name).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["field"], "name");

    let long_username = registration(&"j".repeat(51), "jane@x.com", "secret1");
    let response = app.post("/api/v1/auth/register", &long_username).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["field"], "username");

    let mut at_limits = registration(&"j".repeat(50), "jane@x.com", "secret1");
    at_limits["name"] = json!("J".repeat(100));
    let response = app.post("/api/v1/auth/register", &at_limits).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
}

#[tokio::test]
async fn test_password_over_bcrypt_limit_rejected() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/auth/register",
            &registration("jane123", "jane@x.com", &"a".repeat(73)),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["field"], "password");
}

#[tokio::test]
async fn test_shared_72_byte_prefix_does_not_log_in() {
    let app = TestApp::new();
    let stored = format!("{}X", "a".repeat(71));
    app.register("jane123", "jane@x.com", &stored).await;

    let response = app
        .post(
            "/api/v1/auth/login",
            &json!({"username": "jane123", "password": format!("{}Y", stored)}),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_random_identities_register_and_log_in() {
    let app = TestApp::new();

    for seq in 0..5 {
        let payload = fake_registration(seq);
        let response = app.post("/api/v1/auth/register", &payload).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        assert_eq!(response.body["user"]["name"], payload["name"]);

        let login = app
            .post(
                "/api/v1/auth/login",
                &json!({"username": payload["username"], "password": "secret1"}),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK);
    }
}
