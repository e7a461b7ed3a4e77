use medisearch_vector::SearchMatch;
use serde::{Deserialize, Serialize};

/// Note ingestion request
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Patient identifier, anonymized when missing
    #[serde(default)]
    pub patient_id: Option<String>,

    /// Raw note text
    pub text: String,
}

/// Search query
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query text
    pub q: String,

    /// Top K results
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Clinical question to answer
    pub question: String,
}

/// One ranked search result
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    /// Record identifier
    pub id: String,

    /// Cosine similarity against the query
    pub score: f32,

    /// Stored note text
    pub content: String,

    /// Ingest timestamp, when recorded
    pub timestamp: Option<String>,
}

impl From<SearchMatch> for SearchResultItem {
    fn from(m: SearchMatch) -> Self {
        let timestamp = m.metadata.get("timestamp").cloned();
        Self {
            id: m.id,
            score: m.score,
            content: m.content,
            timestamp,
        }
    }
}
