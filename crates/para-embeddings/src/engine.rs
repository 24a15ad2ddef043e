//! EmbeddingEngine: the entry point for para-embeddings.
//!
//! Wraps the fallback chain and the L1 cache. Cache keys combine the
//! provider name with the blake3 hash of the text, so a vector from the
//! fallback is never served once the primary provider is back.

use para_core::config::EmbeddingConfig;
use para_core::errors::ParaResult;
use para_core::models::DegradationEvent;
use para_core::traits::IEmbeddingProvider;
use tracing::{debug, info};

use crate::cache::EmbeddingCache;
use crate::degradation::DegradationChain;
use crate::providers;

/// An embedding together with the provider that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedded {
    pub vector: Vec<f32>,
    pub provider: String,
}

pub struct EmbeddingEngine {
    chain: DegradationChain,
    cache: EmbeddingCache,
}

impl EmbeddingEngine {
    /// Build the configured provider chain.
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self::from_providers(providers::create_providers(config), config.l1_cache_size)
    }

    /// Build an engine over an explicit provider list, highest priority first.
    pub fn from_providers(list: Vec<Box<dyn IEmbeddingProvider>>, cache_size: u64) -> Self {
        let mut chain = DegradationChain::new();
        for provider in list {
            chain.push(provider);
        }
        info!(
            provider = chain.active_provider_name(),
            providers = chain.len(),
            "embedding engine initialized"
        );
        Self {
            chain,
            cache: EmbeddingCache::new(cache_size),
        }
    }

    /// Embed note text, consulting the cache first.
    ///
    /// Blocking: call from `spawn_blocking` inside an async runtime.
    pub fn embed_text(&self, text: &str) -> ParaResult<Embedded> {
        let hash = EmbeddingCache::hash(text);
        let active = self.chain.active_provider_name().to_string();

        if let Some(vector) = self.cache.get(&active, &hash) {
            debug!(provider = %active, hash = %hash.to_hex(), "embedding cache hit");
            return Ok(Embedded {
                vector,
                provider: active,
            });
        }

        let (vector, provider) = self.chain.embed(text)?;
        self.cache.insert(&provider, hash, vector.clone());
        Ok(Embedded { vector, provider })
    }

    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        self.chain.drain_events()
    }

    pub fn active_provider(&self) -> &str {
        self.chain.active_provider_name()
    }

    pub fn cache_len(&self) -> u64 {
        self.cache.len()
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> ParaResult<Vec<f32>> {
        self.embed_text(text).map(|e| e.vector)
    }

    fn embed_batch(&self, texts: &[String]) -> ParaResult<Vec<Vec<f32>>> {
        self.chain.embed_batch(texts).map(|(vs, _)| vs)
    }

    /// Dimensions of the currently active provider.
    fn dimensions(&self) -> usize {
        self.chain
            .dimensions_of(self.active_provider())
            .unwrap_or(0)
    }

    fn name(&self) -> &str {
        "para-embedding-engine"
    }

    fn is_available(&self) -> bool {
        !self.chain.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TfIdfFallback;

    fn tfidf_engine() -> EmbeddingEngine {
        EmbeddingEngine::from_providers(vec![Box::new(TfIdfFallback::new(128))], 100)
    }

    #[test]
    fn embed_returns_configured_dims() {
        let engine = tfidf_engine();
        let e = engine.embed_text("quarterly planning").unwrap();
        assert_eq!(e.vector.len(), 128);
        assert_eq!(e.provider, "tfidf-fallback");
        assert_eq!(engine.dimensions(), 128);
    }

    #[test]
    fn second_embed_hits_cache() {
        let engine = tfidf_engine();
        let a = engine.embed_text("same text").unwrap();
        let b = engine.embed_text("same text").unwrap();
        assert_eq!(a, b);
        assert_eq!(engine.cache_len(), 1);
    }

    #[test]
    fn default_config_falls_back_when_ollama_is_down() {
        let config = EmbeddingConfig {
            ollama_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            tfidf_dimensions: 32,
            ..Default::default()
        };
        let engine = EmbeddingEngine::new(&config);
        let e = engine.embed_text("gym routine").unwrap();
        assert_eq!(e.provider, "tfidf-fallback");
        assert_eq!(e.vector.len(), 32);
        assert_eq!(engine.drain_degradation_events().len(), 1);
    }
}
