//! Request extractors whose rejections use the API error body

use crate::error::ApiError;
use axum::extract::FromRequest;

/// `axum::Json` that rejects with [`ApiError`] (400 `VALIDATION_ERROR`)
/// instead of axum's plain-text 4xx responses
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
