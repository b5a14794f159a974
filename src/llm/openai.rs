use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::LLMAdapter;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse};

pub struct OpenAIAdapter {
    client: Client<OpenAIConfig>,
}

impl OpenAIAdapter {
    pub fn new(api_key: &str, org_id: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(org) = org_id {
            config = config.with_org_id(org);
        }
        Self {
            client: Client::with_config(config),
        }
    }

    /// Point the adapter at a non-default endpoint (proxies, test servers).
    pub fn with_api_base(api_key: &str, api_base: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            client: Client::with_config(config),
        }
    }
}

fn to_openai_message(message: &LLMMessage) -> AppResult<ChatCompletionRequestMessage> {
    match message.role.as_str() {
        "system" => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map(ChatCompletionRequestMessage::System)
            .map_err(|e| AppError::Internal(e.to_string())),
        "user" => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map(ChatCompletionRequestMessage::User)
            .map_err(|e| AppError::Internal(e.to_string())),
        "assistant" => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map(ChatCompletionRequestMessage::Assistant)
            .map_err(|e| AppError::Internal(e.to_string())),
        other => Err(AppError::Internal(format!(
            "unknown message role: {}",
            other
        ))),
    }
}

#[async_trait]
impl LLMAdapter for OpenAIAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let messages = request
            .messages
            .iter()
            .map(to_openai_message)
            .collect::<AppResult<Vec<_>>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&request.model).messages(messages);
        if let Some(max_tokens) = request.max_tokens {
            builder.max_completion_tokens(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            builder.temperature(temperature);
        }
        let openai_request = builder
            .build()
            .map_err(|e| AppError::LLMApi(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(|e| AppError::LLMApi(e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LLMApi("completion returned no choices".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        let finish_reason = choice
            .finish_reason
            .and_then(|r| serde_json::to_value(r).ok())
            .and_then(|v| v.as_str().map(str::to_string));

        Ok(LLMResponse {
            content,
            finish_reason,
        })
    }
}
