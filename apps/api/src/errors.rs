use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

pub const QUOTA_EXCEEDED_MESSAGE: &str = "OpenAI API quota exceeded. Please check your billing.";
pub const INVALID_CREDENTIAL_MESSAGE: &str =
    "Invalid OpenAI API key. Please check your configuration.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate variations. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{ "success": false, "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("OpenAI API quota exceeded. Please check your billing.")]
    QuotaExceeded,

    #[error("Invalid OpenAI API key. Please check your configuration.")]
    InvalidCredential,

    /// The model answered, but not with the JSON shape we asked for.
    #[error("Model returned an invalid format: {0}")]
    GenerationFormat(String),

    #[error("{0}")]
    Llm(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::InvalidCredential => StatusCode::UNAUTHORIZED,
            AppError::GenerationFormat(_) | AppError::Llm(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::QuotaExceeded(_) => AppError::QuotaExceeded,
            LlmError::InvalidApiKey(_) => AppError::InvalidCredential,
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Validation(msg) => {
                tracing::warn!("Rejected generate request: {msg}");
                msg.clone()
            }
            AppError::Llm(msg) if msg.trim().is_empty() => {
                tracing::error!("LLM error without a message");
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            other => {
                tracing::error!("API error: {other}");
                other.to_string()
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}
