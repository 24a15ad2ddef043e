//! GenerativeClassifier: backend fallback with one repair pass per backend.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use para_core::config::GenerativeConfig;
use para_core::errors::ClassifierError;
use para_core::{CategorySet, FeatureSummary, GenerativeResult};

use crate::backend::{CompletionRequest, GenerativeBackend};
use crate::parser::parse_reply;
use crate::prompt::PromptBuilder;

pub struct GenerativeClassifier {
    backends: Vec<Arc<dyn GenerativeBackend>>,
    prompts: PromptBuilder,
    timeout: Duration,
    temperature: f64,
}

impl GenerativeClassifier {
    pub fn new(
        backends: Vec<Arc<dyn GenerativeBackend>>,
        categories: CategorySet,
        config: &GenerativeConfig,
    ) -> Self {
        Self {
            backends,
            prompts: PromptBuilder::new(categories, config.max_note_chars),
            timeout: Duration::from_secs(config.timeout_secs),
            temperature: config.temperature,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Classify one note.
    ///
    /// Per backend: a timeout or transport failure moves on to the next
    /// backend. An unparseable reply gets exactly one stricter repair
    /// request on the same backend; if that is still unparseable the call
    /// fails with `MalformedResponse` without trying further backends.
    pub async fn classify(
        &self,
        note_text: &str,
        features: &FeatureSummary,
        custom_instruction: Option<&str>,
    ) -> Result<GenerativeResult, ClassifierError> {
        if self.backends.is_empty() {
            return Err(ClassifierError::Unavailable {
                reason: "no generative backends configured".to_string(),
            });
        }

        let user = self.prompts.user(note_text, features);
        let request = CompletionRequest {
            system: self.prompts.system(custom_instruction, false),
            user: user.clone(),
            strict: false,
            temperature: self.temperature,
        };
        let mut failures: Vec<String> = Vec::new();

        for backend in &self.backends {
            let raw = match self.call(backend.as_ref(), &request).await {
                Ok(raw) => raw,
                Err(e) if e.is_fallthrough() => {
                    warn!(backend = backend.name(), error = %e, "generative backend failed, trying next");
                    failures.push(e.to_string());
                    continue;
                }
                Err(e) => return Err(e),
            };

            let first_problem = match parse_reply(&raw, self.prompts.categories()) {
                Ok(result) => return Ok(self.finish(result, backend.name(), false)),
                Err(problem) => problem,
            };
            debug!(backend = backend.name(), problem = %first_problem, "reply unparseable, sending repair request");

            let repair = CompletionRequest {
                system: self.prompts.system(custom_instruction, true),
                user: user.clone(),
                strict: true,
                temperature: 0.0,
            };
            let repaired = match self.call(backend.as_ref(), &repair).await {
                Ok(raw) => raw,
                Err(e) if e.is_fallthrough() => {
                    warn!(backend = backend.name(), error = %e, "repair request failed, trying next");
                    failures.push(e.to_string());
                    continue;
                }
                Err(e) => return Err(e),
            };

            return match parse_reply(&repaired, self.prompts.categories()) {
                Ok(result) => Ok(self.finish(result, backend.name(), true)),
                Err(problem) => {
                    warn!(backend = backend.name(), problem = %problem, "reply still malformed after repair");
                    Err(ClassifierError::MalformedResponse {
                        backend: backend.name().to_string(),
                        reason: problem,
                    })
                }
            };
        }

        Err(ClassifierError::Unavailable {
            reason: failures.join("; "),
        })
    }

    async fn call(
        &self,
        backend: &dyn GenerativeBackend,
        request: &CompletionRequest,
    ) -> Result<String, ClassifierError> {
        match tokio::time::timeout(self.timeout, backend.complete(request)).await {
            Ok(reply) => reply,
            Err(_) => Err(ClassifierError::Timeout {
                backend: backend.name().to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }

    fn finish(&self, mut result: GenerativeResult, backend: &str, repaired: bool) -> GenerativeResult {
        result.backend = backend.to_string();
        result.repaired = repaired;
        info!(
            backend,
            category = %result.category,
            confidence = result.confidence,
            repaired,
            "generative classification"
        );
        result
    }
}
