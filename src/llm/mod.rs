// LLM abstraction layer

pub mod openai;
pub mod provider;

pub use provider::*;
