use medisearch_chat::ChatEngine;
use medisearch_common::{AppConfig, Result};
use medisearch_ingest::PhiMasker;
use medisearch_llm::{LlmClient, OllamaClient};
use medisearch_vector::{IndexHandle, VectorStore};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// In-memory vector store
    pub store: Arc<VectorStore>,

    /// Handle to the notes index
    pub index: IndexHandle,

    /// Embedding and generation backend
    pub llm: Arc<dyn LlmClient>,

    /// Retrieval-augmented chat engine
    pub chat: ChatEngine,

    /// PHI masker applied at ingest time
    pub masker: PhiMasker,
}

impl AppState {
    /// Create new application state backed by Ollama
    pub fn new(config: AppConfig) -> Result<Self> {
        let llm: Arc<dyn LlmClient> = Arc::new(OllamaClient::new(&config.ollama_base_url)?);
        Self::with_client(config, llm)
    }

    /// Create application state with an injected LLM backend
    pub fn with_client(config: AppConfig, llm: Arc<dyn LlmClient>) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(VectorStore::new());
        // The store is in-memory, so every process starts with a fresh index.
        let index = store.create_index(&config.index_name);

        let chat = ChatEngine::new(
            Arc::clone(&llm),
            Arc::clone(&store),
            index.clone(),
            &config.embedding_model,
            &config.llm_model,
        );

        Ok(Self {
            config,
            store,
            index,
            llm,
            chat,
            masker: PhiMasker::new(),
        })
    }
}
