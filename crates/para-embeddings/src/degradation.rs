//! Ordered fallback chain for embedding providers.
//!
//! Providers are tried in priority order. Unavailable providers are skipped;
//! a provider that errors or returns a vector of the wrong length hands over
//! to the next one. Every answer that did not come from the primary provider
//! is recorded as a [`DegradationEvent`].

use std::sync::Mutex;

use para_core::errors::{EmbeddingError, ParaResult};
use para_core::models::DegradationEvent;
use para_core::traits::IEmbeddingProvider;
use tracing::warn;

pub struct DegradationChain {
    chain: Vec<Box<dyn IEmbeddingProvider>>,
    events: Mutex<Vec<DegradationEvent>>,
}

impl Default for DegradationChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DegradationChain {
    pub fn new() -> Self {
        Self {
            chain: Vec::new(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Add a provider to the end of the chain.
    pub fn push(&mut self, provider: Box<dyn IEmbeddingProvider>) {
        self.chain.push(provider);
    }

    /// Embed `text` with the first provider that succeeds.
    ///
    /// Returns the vector and the name of the provider that produced it.
    pub fn embed(&self, text: &str) -> ParaResult<(Vec<f32>, String)> {
        self.run(|p| {
            let v = p.embed(text)?;
            check_dims(p, &v)?;
            Ok(v)
        })
    }

    /// Embed a batch with the first provider that succeeds for all of it.
    pub fn embed_batch(&self, texts: &[String]) -> ParaResult<(Vec<Vec<f32>>, String)> {
        self.run(|p| {
            let vs = p.embed_batch(texts)?;
            for v in &vs {
                check_dims(p, v)?;
            }
            Ok(vs)
        })
    }

    fn run<T>(
        &self,
        attempt: impl Fn(&dyn IEmbeddingProvider) -> ParaResult<T>,
    ) -> ParaResult<(T, String)> {
        let mut last_error = None;
        let primary = self.chain.first().map(|p| p.name().to_string());

        for (i, provider) in self.chain.iter().enumerate() {
            if !provider.is_available() {
                continue;
            }
            match attempt(provider.as_ref()) {
                Ok(out) => {
                    if i > 0 {
                        self.record(DegradationEvent::now(
                            "embeddings",
                            format!(
                                "{} unavailable",
                                primary.as_deref().unwrap_or("primary provider")
                            ),
                            provider.name(),
                        ));
                    }
                    return Ok((out, provider.name().to_string()));
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "embedding provider failed, trying next in chain"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable {
                provider: "all providers exhausted".to_string(),
            }
            .into()
        }))
    }

    fn record(&self, event: DegradationEvent) {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event);
    }

    /// Name of the first available provider.
    pub fn active_provider_name(&self) -> &str {
        self.chain
            .iter()
            .find(|p| p.is_available())
            .map(|p| p.name())
            .unwrap_or("none")
    }

    /// Take all degradation events recorded so far.
    pub fn drain_events(&self) -> Vec<DegradationEvent> {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *events)
    }

    /// Output dimensions of the named provider.
    pub fn dimensions_of(&self, name: &str) -> Option<usize> {
        self.chain
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.dimensions())
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

fn check_dims(provider: &dyn IEmbeddingProvider, v: &[f32]) -> ParaResult<()> {
    if v.len() != provider.dimensions() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: provider.dimensions(),
            actual: v.len(),
        }
        .into());
    }
    Ok(())
}
