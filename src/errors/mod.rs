//! Error handling module for the blog backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Message used for every validation failure; the detail travels in `error`.
pub const VALIDATION_MESSAGE: &str = "Validation error";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Authentication required or credentials rejected
    Unauthorized(String),
    /// Resource not found
    NotFound(String),
    /// Request body failed validation
    Validation(String),
    /// Request is well formed but cannot be honoured
    BadRequest(String),
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Database(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Whether the failure originates on the server side.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Attach the failing operation, e.g. "Error fetching blogs".
    pub fn context(self, context: &'static str) -> AppErrorWithContext {
        AppErrorWithContext {
            error: self,
            context,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            AppError::Unauthorized(_) => "unauthorized",
            AppError::NotFound(_) => "not found",
            AppError::Validation(_) => "validation",
            AppError::BadRequest(_) => "bad request",
            AppError::Database(_) => "database",
            AppError::Internal(_) => "internal",
        };
        write!(f, "{}: {}", kind, self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {:?}", err);
        AppError::Internal(format!("I/O error: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                AppError::Validation(rejection.body_text())
            }
            _ => AppError::BadRequest(rejection.body_text()),
        }
    }
}

/// Failure response envelope: `{ success: false, message, error? }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &AppError, context: &str) -> Self {
        let (message, detail) = match error {
            AppError::Validation(detail) => (VALIDATION_MESSAGE.to_string(), Some(detail.clone())),
            e if e.is_server_error() => (context.to_string(), Some(e.message())),
            e => (e.message(), None),
        };

        Self {
            success: false,
            message,
            error: detail,
        }
    }
}

/// Wrapper type for errors that carry the failing operation as context.
#[derive(Debug)]
pub struct AppErrorWithContext {
    pub error: AppError,
    pub context: &'static str,
}

impl IntoResponse for AppErrorWithContext {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if self.error.is_server_error() {
            tracing::error!(context = self.context, error = %self.error, "request failed");
        } else {
            tracing::debug!(context = self.context, error = %self.error, "request rejected");
        }
        let body = ErrorResponse::new(&self.error, self.context);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_use_context_as_message() {
        let body = ErrorResponse::new(
            &AppError::Database("Database error: disk I/O".to_string()),
            "Error fetching blogs",
        );
        assert!(!body.success);
        assert_eq!(body.message, "Error fetching blogs");
        assert_eq!(body.error.as_deref(), Some("Database error: disk I/O"));
    }

    #[test]
    fn test_validation_errors_carry_detail() {
        let body = ErrorResponse::new(
            &AppError::Validation("\"title\" is required".to_string()),
            "Error creating blog",
        );
        assert_eq!(body.message, "Validation error");
        assert_eq!(body.error.as_deref(), Some("\"title\" is required"));
    }

    #[test]
    fn test_not_found_keeps_its_message() {
        let err = AppError::NotFound("Blog not found".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let body = ErrorResponse::new(&err, "Error fetching blog");
        assert_eq!(body.message, "Blog not found");
        assert!(body.error.is_none());

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_display_names_the_kind() {
        let err = AppError::BadRequest("Blog with this slug already exists".to_string());
        assert_eq!(err.to_string(), "bad request: Blog with this slug already exists");
    }
}
