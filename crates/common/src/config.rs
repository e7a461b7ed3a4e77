use crate::error::MediSearchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// MediSearch application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Data directory (note files, benchmark inputs)
    pub data_dir: PathBuf,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Embedding model name
    pub embedding_model: String,

    /// LLM answer model name
    pub llm_model: String,

    /// Name of the vector index holding clinical notes
    pub index_name: String,

    /// Whether to mask PHI before embedding ingested text
    pub mask_phi: bool,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            llm_model: "llama3.2:latest".to_string(),
            index_name: "clinical-notes".to_string(),
            mask_phi: true,
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            log_dir: PathBuf::from("./data/log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, MediSearchError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let config = Self {
            data_dir: Self::get_env_path("DATA_DIR")
                .unwrap_or_else(|| PathBuf::from("./data")),
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text".to_string()),
            llm_model: std::env::var("LLM_MODEL")
                .unwrap_or_else(|_| "llama3.2:latest".to_string()),
            index_name: std::env::var("INDEX_NAME")
                .unwrap_or_else(|_| "clinical-notes".to_string()),
            mask_phi: std::env::var("MASK_PHI")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            log_dir: Self::get_env_path("LOG_DIR")
                .unwrap_or_else(|| PathBuf::from("./data/log")),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string()),
        };

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), MediSearchError> {
        let dirs = vec![&self.data_dir, &self.log_dir];

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    MediSearchError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Get full path for a file under the data directory
    pub fn get_data_path(&self, filename: &str) -> PathBuf {
        self.data_dir.join(filename)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), MediSearchError> {
        // Validate Ollama URL
        if !self.ollama_base_url.starts_with("http://")
            && !self.ollama_base_url.starts_with("https://") {
            return Err(MediSearchError::config(
                "Ollama base URL must start with http:// or https://"
            ));
        }

        // Validate model names
        if self.embedding_model.is_empty() {
            return Err(MediSearchError::config("Embedding model name cannot be empty"));
        }
        if self.llm_model.is_empty() {
            return Err(MediSearchError::config("LLM model name cannot be empty"));
        }

        // Validate index name
        if self.index_name.is_empty() {
            return Err(MediSearchError::config("Index name cannot be empty"));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(MediSearchError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}
