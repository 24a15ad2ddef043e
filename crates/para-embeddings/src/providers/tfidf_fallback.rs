//! Hashed term-frequency fallback provider.
//!
//! Signed feature hashing of sublinear term frequencies into a fixed number
//! of buckets. No network, no model files: always available.

use std::collections::HashMap;

use para_core::errors::ParaResult;
use para_core::traits::IEmbeddingProvider;

/// Words too common to say anything about a note's category.
const STOPWORDS: [&str; 32] = [
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "his", "how", "its", "may", "new", "now", "see", "who", "did",
    "this", "that", "with", "from", "have", "will",
];

/// Hashed TF fallback embedding provider.
pub struct TfIdfFallback {
    dimensions: usize,
}

impl TfIdfFallback {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// FNV-1a 64-bit hash of a term.
    fn hash_term(term: &str) -> u64 {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        h
    }

    /// Lowercase alphanumeric terms of two or more characters, minus stopwords.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.chars().count() >= 2)
            .map(str::to_lowercase)
            .filter(|s| !STOPWORDS.contains(&s.as_str()))
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimensions];
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec;
        }

        let mut tf: HashMap<&str, u32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1;
        }

        for (term, count) in tf {
            let h = Self::hash_term(term);
            let bucket = (h % self.dimensions as u64) as usize;
            // High bit picks the sign so colliding terms tend to cancel.
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            let weight = 1.0 + (count as f32).ln();
            // Longer terms are rarer; a cheap stand-in for document frequency.
            let rarity = 1.0 + (term.chars().count() as f32).ln();
            vec[bucket] += sign * weight * rarity;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for TfIdfFallback {
    fn embed(&self, text: &str) -> ParaResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn embed_batch(&self, texts: &[String]) -> ParaResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "tfidf-fallback"
    }

    fn is_available(&self) -> bool {
        true
    }
}
