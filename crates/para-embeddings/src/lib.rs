//! # para-embeddings
//!
//! Turns note text into vectors for the semantic index. Providers are tried
//! in configured order (Ollama, then a hashed TF-IDF fallback that is always
//! available); every fallback is recorded as a degradation event. Results
//! are cached in memory per provider and blake3 content hash.

pub mod cache;
pub mod degradation;
pub mod engine;
pub mod providers;

pub use cache::EmbeddingCache;
pub use degradation::DegradationChain;
pub use engine::{Embedded, EmbeddingEngine};
pub use providers::{OllamaProvider, TfIdfFallback};
