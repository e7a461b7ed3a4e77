//! MediSearch LLM Integration
//!
//! Ollama API client for embeddings and answer generation

mod client;
mod llm_trait;
mod types;

pub use client::OllamaClient;
pub use llm_trait::LlmClient;
pub use types::{EmbedRequest, EmbedResponse, GenerateOptions, GenerateRequest, GenerateResponse};
