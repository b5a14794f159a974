use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Front door to the completion provider. Owns the adapter and the request
/// deadline; a call that outlives the deadline is reported as an error, never
/// retried.
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    timeout: Duration,
}

impl LLM {
    pub fn new(config: &LLMConfig) -> Self {
        let adapter = Arc::new(crate::llm::openai::OpenAIAdapter::new(
            &config.api_key,
            config.org_id.as_deref(),
        ));
        Self {
            adapter,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Construct with an explicit adapter; the seam used by tests.
    pub fn with_adapter(adapter: Arc<dyn LLMAdapter>, timeout: Duration) -> Self {
        Self { adapter, timeout }
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        tokio::time::timeout(self.timeout, self.adapter.create_chat_completion(request))
            .await
            .map_err(|_| AppError::LLMTimeout(self.timeout.as_secs()))?
    }
}
