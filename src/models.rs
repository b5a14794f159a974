use std::sync::Arc;

use crate::config::Config;
use crate::llm::LLM;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<LLM>,
}

impl AppState {
    /// Build the process-wide state: configuration plus a single LLM client
    /// shared by every request handler.
    pub fn new(config: Config) -> Self {
        let llm = Arc::new(LLM::new(&config.llm));
        Self { config, llm }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResponse {
    pub result: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
