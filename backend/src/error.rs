//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use crate::repositories::{StoreError, UniqueField};
use axum::{
    extract::rejection::JsonRejection,
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cointelligence_shared::{ErrorDetail, ErrorResponse, ValidationError};
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Username already registered")]
    DuplicateUsername,

    #[error("Email already registered")]
    DuplicateEmail,

    /// Same variant for unknown usernames and wrong passwords
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("Inactive user")]
    InactiveUser,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Credential store error")]
    Store(StoreError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(UniqueField::Username) => ApiError::DuplicateUsername,
            StoreError::DuplicateKey(UniqueField::Email) => ApiError::DuplicateEmail,
            other => ApiError::Store(other),
        }
    }
}

/// Unreadable request bodies are validation failures.
///
/// serde names a missing field; every other rejection is reported against
/// the body as a whole.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        let field = missing_field(&detail).unwrap_or("body").to_string();

        ApiError::Validation {
            field,
            message: detail,
        }
    }
}

fn missing_field(detail: &str) -> Option<&str> {
    let (_, rest) = detail.split_once("missing field `")?;
    let (field, _) = rest.split_once('`')?;
    Some(field)
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. }
            | ApiError::DuplicateUsername
            | ApiError::DuplicateEmail
            | ApiError::InactiveUser => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::DuplicateUsername => "DUPLICATE_USERNAME",
            ApiError::DuplicateEmail => "DUPLICATE_EMAIL",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::InactiveUser => "INACTIVE_USER",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Store(_) => "DATABASE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let (message, field) = match &self {
            ApiError::Validation { field, message } => (message.clone(), Some(field.clone())),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                ("An internal error occurred".to_string(), None)
            }
            ApiError::Store(err) => {
                error!("Credential store error: {:?}", err);
                ("A database error occurred".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
