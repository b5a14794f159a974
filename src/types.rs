// Type definitions shared across the request pipeline

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::ErrorResponse;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Unable to extract text from PDF. It may be image-only or scanned without OCR.")]
    UnextractableContent,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("LLM request timed out after {0}s")]
    LLMTimeout(u64),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingFile | AppError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::UnextractableContent => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", self),
            ),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
