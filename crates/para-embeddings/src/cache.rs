//! Embedding cache (moka), keyed by provider and the blake3 hash of the
//! note text. Vectors from different providers never mix under one key.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

const IDLE: Duration = Duration::from_secs(60 * 60);
const TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub struct EmbeddingCache {
    cache: Cache<(Arc<str>, blake3::Hash), Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_entries)
                .time_to_idle(IDLE)
                .time_to_live(TTL)
                .build(),
        }
    }

    pub fn hash(text: &str) -> blake3::Hash {
        blake3::hash(text.as_bytes())
    }

    pub fn get(&self, provider: &str, hash: &blake3::Hash) -> Option<Vec<f32>> {
        self.cache.get(&(Arc::from(provider), *hash))
    }

    pub fn insert(&self, provider: &str, hash: blake3::Hash, vector: Vec<f32>) {
        self.cache.insert((Arc::from(provider), hash), vector);
    }

    /// Approximate entry count; moka applies writes lazily.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_scoped_by_provider() {
        let cache = EmbeddingCache::new(100);
        let h = EmbeddingCache::hash("weekly review");
        cache.insert("ollama", h, vec![1.0, 2.0]);
        assert_eq!(cache.get("ollama", &h), Some(vec![1.0, 2.0]));
        assert_eq!(cache.get("tfidf-fallback", &h), None);
        assert_eq!(cache.get("ollama", &EmbeddingCache::hash("other")), None);
    }
}
