use std::sync::Arc;
use std::time::Instant;

use medisearch_common::Result;
use medisearch_llm::{GenerateOptions, GenerateRequest, LlmClient};
use medisearch_vector::{IndexHandle, SearchMatch, VectorStore};
use serde::Serialize;
use tracing::debug;

use crate::prompts::{answer_prompt, build_context};

/// Records retrieved per question unless overridden
const DEFAULT_TOP_K: usize = 5;

/// Retrieval-augmented answers over an index of masked clinical notes
pub struct ChatEngine {
    llm: Arc<dyn LlmClient>,
    store: Arc<VectorStore>,
    index: IndexHandle,
    embedding_model: String,
    llm_model: String,
    top_k: usize,
}

/// An answer with its retrieval provenance
#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    /// Generated answer text
    pub answer: String,

    /// Records the answer was grounded on (ids and scores, for audit)
    pub matches: Vec<SearchMatch>,

    /// Time spent in the vector query, in milliseconds
    pub retrieval_ms: f64,
}

impl ChatEngine {
    /// Create new chat engine over an existing index
    pub fn new(
        llm: Arc<dyn LlmClient>,
        store: Arc<VectorStore>,
        index: IndexHandle,
        embedding_model: impl Into<String>,
        llm_model: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            store,
            index,
            embedding_model: embedding_model.into(),
            llm_model: llm_model.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Override how many records are retrieved per question
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer a question using retrieved note context
    ///
    /// Embeds the question, ranks the index, quotes the top matches into
    /// the clinical prompt and generates deterministically (temperature 0).
    pub async fn answer(&self, question: &str) -> Result<ChatAnswer> {
        let query_vector = self.llm.embed(&self.embedding_model, question).await?;

        let started = Instant::now();
        let matches = self.store.query(&self.index, &query_vector, self.top_k)?;
        let retrieval_ms = started.elapsed().as_secs_f64() * 1000.0;

        debug!(
            "Retrieved {} matches in {:.3} ms for question ({} chars)",
            matches.len(),
            retrieval_ms,
            question.len()
        );

        let context = build_context(&matches);
        let prompt = answer_prompt(&context, question);

        let request = GenerateRequest {
            model: self.llm_model.clone(),
            prompt,
            stream: Some(false),
            options: Some(GenerateOptions {
                temperature: Some(0.0),
                top_p: None,
                num_predict: Some(512),
            }),
        };
        let answer = self.llm.generate(request).await?;

        Ok(ChatAnswer {
            answer,
            matches,
            retrieval_ms,
        })
    }
}
