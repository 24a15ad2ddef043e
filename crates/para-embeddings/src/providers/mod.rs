//! Embedding providers and the factory that builds the configured chain.

mod ollama_provider;
mod tfidf_fallback;

pub use ollama_provider::OllamaProvider;
pub use tfidf_fallback::TfIdfFallback;

use para_core::config::EmbeddingConfig;
use para_core::traits::IEmbeddingProvider;
use tracing::warn;

/// Build providers in the order named by `config.providers`.
///
/// Unknown names are skipped with a warning. The TF-IDF fallback is appended
/// when the list does not already end with it, so the chain never runs dry.
pub fn create_providers(config: &EmbeddingConfig) -> Vec<Box<dyn IEmbeddingProvider>> {
    let mut providers: Vec<Box<dyn IEmbeddingProvider>> = Vec::new();
    let mut has_tfidf = false;

    for name in &config.providers {
        match name.as_str() {
            "ollama" => providers.push(Box::new(OllamaProvider::new(
                config.model.clone(),
                config.dimensions,
                Some(config.ollama_url.clone()),
                config.timeout_secs,
            ))),
            "tfidf" => {
                has_tfidf = true;
                providers.push(Box::new(TfIdfFallback::new(config.tfidf_dimensions)));
            }
            other => warn!(provider = other, "unknown embedding provider, skipping"),
        }
    }

    if !has_tfidf {
        providers.push(Box::new(TfIdfFallback::new(config.tfidf_dimensions)));
    }
    providers
}
