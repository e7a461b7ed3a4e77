use async_trait::async_trait;
use medisearch_common::{MediSearchError, Result};
use reqwest::Client;
use tracing::{debug, info};

use crate::llm_trait::LlmClient;
use crate::types::{EmbedRequest, EmbedResponse, GenerateRequest, GenerateResponse};

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: Client,
}

impl OllamaClient {
    /// Create new Ollama client
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300)) // 5 minutes for LLM calls
            .build()
            .map_err(|e| MediSearchError::llm(format!("Failed to create HTTP client: {}", e)))?;

        info!("Ollama client initialized: {}", base_url);
        Ok(Self { base_url, client })
    }

    /// Generate text with custom retry count
    async fn generate_with_retry(
        &self,
        request: GenerateRequest,
        max_retries: u32,
    ) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        debug!(
            "Sending generate request to Ollama - Model: {}, Prompt length: {}",
            request.model,
            request.prompt.len()
        );

        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.try_generate(&url, &request).await {
                Ok(response) => {
                    debug!("Received response from Ollama - Length: {}", response.len());
                    return Ok(response);
                }
                Err(e) => {
                    if attempt < max_retries {
                        let delay = std::time::Duration::from_secs(2u64.pow(attempt - 1));
                        tracing::warn!(
                            "Ollama request failed (attempt {}/{}): {}. Retrying in {:?}...",
                            attempt,
                            max_retries,
                            e,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| MediSearchError::llm("All retries failed")))
    }

    /// Single attempt to generate text
    async fn try_generate(&self, url: &str, request: &GenerateRequest) -> Result<String> {
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MediSearchError::llm(format!("Failed to send request: {}", e)))?
            .error_for_status()
            .map_err(|e| MediSearchError::llm(format!("Ollama API error: {}", e)))?;

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| MediSearchError::llm(format!("Failed to parse response: {}", e)))?;

        if result.response.is_empty() {
            return Err(MediSearchError::llm("Empty response from Ollama"));
        }

        debug!("Generate complete - Model: {}, Done: {}", result.model, result.done);
        Ok(result.response)
    }

    /// Generate embedding with custom retry count
    async fn embed_with_retry(
        &self,
        model: &str,
        text: &str,
        max_retries: u32,
    ) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        debug!(
            "Generating embedding - Model: {}, Text length: {}",
            model,
            text.len()
        );

        let request = EmbedRequest {
            model: model.to_string(),
            prompt: text.to_string(),
        };

        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.try_embed(&url, &request).await {
                Ok(embedding) => {
                    debug!("Received embedding - Dimension: {}", embedding.len());
                    return Ok(embedding);
                }
                Err(e) => {
                    if attempt < max_retries {
                        let delay = std::time::Duration::from_secs(2u64.pow(attempt - 1));
                        tracing::warn!(
                            "Embedding request failed (attempt {}/{}). Retrying in {:?}...",
                            attempt,
                            max_retries,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| MediSearchError::embedding("All retries failed")))
    }

    /// Single attempt to generate embedding
    async fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MediSearchError::embedding(format!("Failed to send embedding request: {}", e)))?
            .error_for_status()
            .map_err(|e| MediSearchError::embedding(format!("Ollama embedding API error: {}", e)))?;

        let result: EmbedResponse = response
            .json()
            .await
            .map_err(|e| MediSearchError::embedding(format!("Failed to parse embedding response: {}", e)))?;

        if result.embedding.is_empty() {
            return Err(MediSearchError::embedding("Empty embedding from Ollama"));
        }

        Ok(result.embedding)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String> {
        self.generate_with_retry(request, 3).await
    }

    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        self.embed_with_retry(model, text, 3).await
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MediSearchError::llm(format!("Failed to connect to Ollama: {}", e)))?;
        Ok(response.status().is_success())
    }
}
