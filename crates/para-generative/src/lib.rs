//! # para-generative
//!
//! Asks a language model which category a note belongs to. Requests carry
//! the category enumeration, base rules, the note's feature summary and
//! an optional caller instruction. Replies are parsed leniently, repaired
//! once with a stricter request, and normalized onto the configured
//! categories. Backends are tried in order on timeout or transport failure.

pub mod backend;
pub mod classifier;
pub mod ollama;
pub mod parser;
pub mod prompt;

pub use backend::{build_backends, CompletionRequest, GenerativeBackend};
pub use classifier::GenerativeClassifier;
pub use ollama::OllamaBackend;
