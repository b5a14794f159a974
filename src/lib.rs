// Statement Analyzer - bank-statement PDF parsing via an LLM completion API

pub mod config;
pub mod extract;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
