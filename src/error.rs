//! Common error types for the cover art service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message used when every attempt failed without a captured error
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The image service is unavailable. Please try again later.";

/// Application-wide error type
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API key is not configured. Set GEMINI_API_KEY or API_KEY.")]
    MissingCredential,

    #[error("The API key is invalid. Please check your configuration.")]
    InvalidCredential,

    #[error("The request was blocked by the content policy. Please try a different title.")]
    ContentPolicyViolation,

    #[error("No image was generated. Please try a different title.")]
    EmptyResult,

    #[error("{0}")]
    Transient(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A generation is already in progress")]
    GenerationInProgress,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Only transient failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Transient(_))
    }
}

/// Error response format
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
            AppError::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
            AppError::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                Some("missing_api_key"),
            ),
            AppError::InvalidCredential => (
                StatusCode::BAD_GATEWAY,
                "authentication_error",
                Some("invalid_api_key"),
            ),
            AppError::ContentPolicyViolation => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "content_policy_error",
                Some("content_policy_violation"),
            ),
            AppError::EmptyResult => {
                (StatusCode::BAD_GATEWAY, "backend_error", Some("empty_result"))
            }
            AppError::Transient(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "backend_error",
                Some("service_unavailable"),
            ),
            AppError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", None)
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found_error", None),
            AppError::GenerationInProgress => (
                StatusCode::CONFLICT,
                "conflict_error",
                Some("generation_in_progress"),
            ),
            AppError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                Some("storage_failure"),
            ),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                message: self.to_string(),
                r#type: error_type.to_string(),
                code: code.map(|c| c.to_string()),
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
