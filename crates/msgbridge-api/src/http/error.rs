//! Application error type mapping store failures to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use msgbridge_types::error::StoreError;

/// Request-layer error wrapper.
#[derive(Debug)]
pub enum AppError {
    /// Errors surfaced by the upstream store.
    Store(StoreError),
    /// Request validation failure.
    Validation(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Store(StoreError::ChatNotFound(id)) => (
                StatusCode::NOT_FOUND,
                "CHAT_NOT_FOUND",
                format!("Chat '{id}' not found"),
            ),
            AppError::Store(StoreError::Unavailable(msg)) => (
                StatusCode::BAD_GATEWAY,
                "STORE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::Store(StoreError::InvalidResponse(msg)) => (
                StatusCode::BAD_GATEWAY,
                "STORE_INVALID_RESPONSE",
                msg.clone(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
