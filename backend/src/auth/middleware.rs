//! Bearer-token extraction
//!
//! [`CurrentUser`] reads `Authorization: Bearer <token>`, verifies the token
//! and rehydrates the account from the credential store, so handlers always
//! see the current state of an active user.

use crate::error::ApiError;
use crate::repositories::UserRecord;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

/// Authenticated, active user extracted from a bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

/// Pull the token out of an `Authorization` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;
        let user = app_state.authenticator().authenticate_token(token).await?;

        Ok(CurrentUser(user))
    }
}
