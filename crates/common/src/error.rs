/// MediSearch error types
#[derive(Debug, thiserror::Error)]
pub enum MediSearchError {
    /// Vector dimension disagreement between an index and an incoming vector
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Operation against an index name that does not exist
    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    /// Embedding related error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// LLM related error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MediSearchError {
    /// Create dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create unknown index error
    pub fn unknown_index<S: Into<String>>(name: S) -> Self {
        Self::UnknownIndex(name.into())
    }

    /// Create embedding error
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create LLM error
    pub fn llm<S: Into<String>>(msg: S) -> Self {
        Self::Llm(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

// HTTP response conversion (for actix-web)
impl MediSearchError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::DimensionMismatch { .. } => 400,
            Self::InvalidInput(_) => 400,
            Self::Json(_) => 400,
            Self::UnknownIndex(_) => 404,
            Self::NotFound(_) => 404,
            Self::Embedding(_) => 502,
            Self::Llm(_) => 502,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = MediSearchError::dimension_mismatch(384, 768);
        assert_eq!(err.to_string(), "Dimension mismatch: expected 384, got 768");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(MediSearchError::dimension_mismatch(3, 4).status_code(), 400);
        assert_eq!(MediSearchError::unknown_index("notes").status_code(), 404);
        assert_eq!(MediSearchError::embedding("down").status_code(), 502);
        assert_eq!(MediSearchError::internal("boom").status_code(), 500);
    }
}
