use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A stored embedding with its anonymized source text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Record identifier (anonymized patient/document id)
    pub id: String,

    /// Embedding vector
    pub vector: Vec<f32>,

    /// Text the vector was computed from (already PHI-masked)
    pub content: String,

    /// Arbitrary string metadata (timestamps, tags)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl VectorRecord {
    /// Create new record without metadata
    pub fn new(id: impl Into<String>, vector: Vec<f32>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vector,
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry (builder style)
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Number of dimensions in the embedding
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// A query hit: the matched record plus its similarity score
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    /// Record identifier
    pub id: String,

    /// Cosine similarity against the query vector
    pub score: f32,

    /// Stored text of the record
    pub content: String,

    /// Stored metadata of the record
    pub metadata: HashMap<String, String>,
}

impl SearchMatch {
    pub fn new(id: String, score: f32, content: String, metadata: HashMap<String, String>) -> Self {
        Self {
            id,
            score,
            content,
            metadata,
        }
    }
}

/// Handle to a named index
///
/// Store operations accept anything string-like, so a handle can be used
/// interchangeably with the index name it was created from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexHandle(String);

impl IndexHandle {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name of the index this handle points at
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for IndexHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point-in-time index statistics
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    /// Index name
    pub name: String,

    /// Number of stored records
    pub record_count: usize,

    /// Locked dimension, unset until the first accepted upsert
    pub dimension: Option<usize>,
}

/// A named index: insertion-ordered records plus the locked dimension
///
/// The dimension stays unset until the first non-empty batch is accepted;
/// from then on every stored vector has exactly that length.
#[derive(Debug, Default)]
pub(crate) struct VectorIndex {
    pub(crate) records: Vec<VectorRecord>,
    pub(crate) dimension: Option<usize>,
}
