//! API error types and JSON response formatting.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::Error;
use crate::auth::AuthError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Missing or malformed request input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    /// Song not found error.
    pub fn song_not_found(song_id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "SONG_NOT_FOUND",
            "Song not found in database",
        )
        .with_details(serde_json::json!({ "songId": song_id }))
    }

    /// Store read or write failure. The message never carries the cause.
    pub fn persistence(message: &'static str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "PERSISTENCE_ERROR",
            message,
        )
    }

    /// Login is not configured on this server.
    pub fn auth_disabled() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "AUTH_DISABLED",
            "Login is not configured",
        )
    }

    /// Convert a library error, using `context` as the message for
    /// persistence failures.
    pub fn from_stats(err: Error, context: &'static str) -> Self {
        match err {
            Error::Validation(msg) => Self::validation(msg),
            Error::NotFound(song_id) => Self::song_not_found(&song_id),
            Error::Persistence(e) => {
                tracing::error!(error = %e, "{}", context);
                Self::persistence(context)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.code,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        Self::validation("Missing required fields")
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Provider { error, body } => Self::new(
                StatusCode::BAD_REQUEST,
                "AUTH_PROVIDER_ERROR",
                format!("Error obtaining token: {}", error),
            )
            .with_details(body),
            other => {
                tracing::error!(error = %other, "token exchange failed");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "AUTH_UPSTREAM_ERROR",
                    "Failed to reach the login provider",
                )
            }
        }
    }
}
