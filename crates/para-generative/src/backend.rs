//! The capability a generative backend must provide.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use para_core::config::GenerativeConfig;
use para_core::errors::ClassifierError;

use crate::ollama::OllamaBackend;

/// One chat-style completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    /// Set on the repair request: the backend should constrain output to JSON.
    pub strict: bool,
    pub temperature: f64,
}

/// A language model reachable over some transport.
///
/// Implementations report transport problems as
/// [`ClassifierError::Transport`]; the classifier applies its own timeout.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Return the raw text of the model's reply.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ClassifierError>;
}

/// Build the configured backend list. Unknown kinds are skipped.
pub fn build_backends(config: &GenerativeConfig) -> Vec<Arc<dyn GenerativeBackend>> {
    let mut backends: Vec<Arc<dyn GenerativeBackend>> = Vec::new();
    for b in &config.backends {
        match b.kind.as_str() {
            "ollama" => backends.push(Arc::new(OllamaBackend::new(&b.base_url, &b.model))),
            other => warn!(kind = other, "unknown generative backend kind, skipping"),
        }
    }
    backends
}
