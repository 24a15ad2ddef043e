use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Providers in fallback order: "ollama", "tfidf".
    pub providers: Vec<String>,
    pub ollama_url: String,
    pub model: String,
    /// Dimensions reported by the Ollama model.
    pub dimensions: usize,
    /// Hash buckets used by the TF-IDF fallback.
    pub tfidf_dimensions: usize,
    /// L1 in-memory cache max entries.
    pub l1_cache_size: u64,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            providers: defaults::DEFAULT_EMBEDDING_PROVIDERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ollama_url: defaults::DEFAULT_OLLAMA_URL.to_string(),
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            tfidf_dimensions: defaults::DEFAULT_TFIDF_DIMENSIONS,
            l1_cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
            timeout_secs: defaults::DEFAULT_EMBEDDING_TIMEOUT_SECS,
        }
    }
}
