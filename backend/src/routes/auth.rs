//! Authentication routes
//!
//! Provides endpoints for user registration, login, token refresh,
//! the current-user profile and logout.
//!
//! Password hashing runs on the blocking thread pool, and JWT keys are
//! pre-computed in AppState.

use crate::auth::CurrentUser;
use super::extract::AppJson;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use cointelligence_shared::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, TokenResponse, UserResponse,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_current_user))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh_token))
}

fn token_response(state: &AppState, access_token: String) -> TokenResponse {
    TokenResponse::bearer(
        access_token,
        state.authenticator().tokens().default_ttl_secs(),
    )
}

/// Register a new user
///
/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let (user, token) = state.authenticator().register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token: token_response(&state, token),
            message: "Registration successful".to_string(),
        }),
    ))
}

/// Login with username and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (user, token) = state
        .authenticator()
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token: token_response(&state, token),
        message: "Login successful".to_string(),
    }))
}

/// Get the authenticated user
///
/// GET /api/v1/auth/me
async fn get_current_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Logout
///
/// POST /api/v1/auth/logout
///
/// Tokens are stateless, so the server keeps nothing to revoke; the client
/// discards its token.
async fn logout(CurrentUser(_): CurrentUser) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logout successful".to_string(),
        detail: Some("Please remove the token from client storage".to_string()),
    })
}

/// Issue a fresh token to a holder of a valid one
///
/// POST /api/v1/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.authenticator().refresh(&user)?;
    Ok(Json(token_response(&state, token)))
}
