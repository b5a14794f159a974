//! Bank-statement analysis endpoint.
//!
//! Single-pass pipeline: receive the uploaded PDF, extract its text, truncate,
//! send one chat-completion request, relay the completion verbatim. Stateless
//! across requests; a failed completion is reported immediately, never retried.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::{routing::post, Json, Router};
use bytes::Bytes;
use tracing::{debug, info};

use crate::extract::{extract_statement_text, truncate_chars};
use crate::models::{AnalysisResponse, AppState};
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest};

/// Hard cutoff on the extracted text sent to the model, in characters.
pub const MAX_PROMPT_CHARS: usize = 12_000;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const SAMPLING_TEMPERATURE: f32 = 0.2;

const ANALYST_INSTRUCTION: &str = "You're a financial underwriting assistant. \
Read the bank statement and return JSON:\n\
- Monthly revenue\n- NSF count\n- Transfers\n- Cash deposits\n- Days under $2K\n\
- Transactions as objects with date, description, amount, category";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/parse-bank-statement", post(parse_bank_statement))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn parse_bank_statement(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<AnalysisResponse>> {
    let (filename, data) = read_file_field(&mut multipart).await?;
    if data.is_empty() {
        return Err(AppError::MissingFile);
    }
    info!(filename = %filename, size = data.len(), "received bank statement upload");

    // lopdf parsing is synchronous and CPU-bound; keep it off the runtime.
    let mut text = tokio::task::spawn_blocking(move || extract_statement_text(&data))
        .await
        .map_err(|e| AppError::Internal(format!("extraction task failed: {}", e)))??;

    if text.trim().is_empty() {
        return Err(AppError::UnextractableContent);
    }
    truncate_chars(&mut text, MAX_PROMPT_CHARS);
    debug!(chars = text.chars().count(), "extracted statement text");

    let request = LLMRequest {
        model: state.config.llm.model.clone(),
        messages: vec![
            LLMMessage::system(ANALYST_INSTRUCTION),
            LLMMessage::user(text),
        ],
        max_tokens: None,
        temperature: Some(SAMPLING_TEMPERATURE),
    };

    let response = state.llm.create_chat_completion(&request).await?;
    info!(chars = response.content.len(), "completion received");

    // The completion is relayed verbatim; its JSON shape is not validated.
    Ok(Json(AnalysisResponse {
        result: response.content,
    }))
}

async fn read_file_field(multipart: &mut Multipart) -> AppResult<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("failed to parse multipart data: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("statement.pdf").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(format!("failed to read file field: {}", e)))?;
        return Ok((filename, data));
    }
    Err(AppError::MissingFile)
}
