use crate::types::GenerateRequest;
use async_trait::async_trait;
use medisearch_common::Result;

/// Common trait for LLM backends
///
/// The composition root owns one shared client; ingestion, search and chat
/// all borrow it through this trait rather than a concrete type.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate text from a prompt
    async fn generate(&self, request: GenerateRequest) -> Result<String>;

    /// Generate embedding for text
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>>;

    /// Test connection/availability
    async fn test_connection(&self) -> Result<bool>;
}
