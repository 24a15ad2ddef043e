//! Ollama embedding provider (`POST /api/embed`).
//!
//! Blocking interface over a per-call current-thread runtime; callers on an
//! async runtime must invoke it from `spawn_blocking`. After a transport
//! failure the provider reports itself unavailable for a cooldown period so
//! the chain skips straight to the fallback.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;
use para_core::errors::{EmbeddingError, ParaResult};
use para_core::traits::IEmbeddingProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Seconds a failed provider sits out before being retried.
const RETRY_COOLDOWN_SECS: i64 = 60;

pub struct OllamaProvider {
    base_url: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
    /// Unix seconds until which the provider is considered down; 0 when up.
    down_until: AtomicI64,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaProvider {
    /// `base_url` defaults to `http://localhost:11434`.
    pub fn new(model: String, dimensions: usize, base_url: Option<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url
                .unwrap_or_else(|| para_core::config::defaults::DEFAULT_OLLAMA_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model,
            dimensions,
            timeout: Duration::from_secs(timeout_secs.max(1)),
            down_until: AtomicI64::new(0),
        }
    }

    /// Probe `/api/tags` and update availability.
    pub fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let result = block_on(async {
            reqwest::Client::new()
                .get(&url)
                .timeout(Duration::from_secs(5))
                .send()
                .await
        });
        match result {
            Ok(Ok(resp)) if resp.status().is_success() => {
                self.down_until.store(0, Ordering::Relaxed);
                debug!(model = %self.model, "ollama health check passed");
                true
            }
            Ok(Ok(resp)) => {
                warn!(status = %resp.status(), "ollama health check failed");
                self.mark_down();
                false
            }
            Ok(Err(e)) => {
                warn!(error = %e, "ollama unreachable");
                self.mark_down();
                false
            }
            Err(e) => {
                warn!(error = %e, "could not start runtime for ollama health check");
                false
            }
        }
    }

    fn mark_down(&self) {
        self.down_until
            .store(Utc::now().timestamp() + RETRY_COOLDOWN_SECS, Ordering::Relaxed);
    }

    fn request_embeddings(&self, texts: &[String]) -> ParaResult<Vec<Vec<f32>>> {
        if !self.is_available() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.name().to_string(),
            }
            .into());
        }

        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        let timeout = self.timeout;

        let outcome = block_on(async {
            let response = reqwest::Client::new()
                .post(&url)
                .timeout(timeout)
                .json(&request)
                .send()
                .await
                .map_err(|e| format!("ollama HTTP error: {e}"))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(format!("ollama returned {status}: {body}"));
            }
            response
                .json::<EmbedResponse>()
                .await
                .map_err(|e| format!("ollama JSON parse error: {e}"))
        })
        .map_err(|e| EmbeddingError::InferenceFailed {
            reason: format!("runtime error: {e}"),
        })?;

        let resp = outcome.map_err(|reason| {
            self.mark_down();
            EmbeddingError::InferenceFailed { reason }
        })?;

        for v in &resp.embeddings {
            if v.len() != self.dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: v.len(),
                }
                .into());
            }
        }
        Ok(resp.embeddings)
    }
}

fn block_on<F: std::future::Future>(fut: F) -> std::io::Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(rt.block_on(fut))
}

impl IEmbeddingProvider for OllamaProvider {
    fn embed(&self, text: &str) -> ParaResult<Vec<f32>> {
        let results = self.request_embeddings(&[text.to_string()])?;
        results.into_iter().next().ok_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "empty ollama response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> ParaResult<Vec<Vec<f32>>> {
        self.request_embeddings(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.down_until.load(Ordering::Relaxed) <= Utc::now().timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_server_marks_provider_down() {
        // Port 9 (discard) is closed on test machines; connection is refused fast.
        let p = OllamaProvider::new("m".to_string(), 8, Some("http://127.0.0.1:9".to_string()), 2);
        assert!(p.is_available());
        assert!(p.embed("hello").is_err());
        assert!(!p.is_available());
    }
}
