//! Copy-on-write publication of the current weight vector.

use std::sync::{Arc, RwLock};

use tracing::info;

use para_core::errors::{LearningError, ParaResult};
use para_core::WeightVector;

/// Holds the current [`WeightVector`]. Readers take an `Arc` snapshot that
/// never changes under them; writers swap in a whole new version.
#[derive(Debug)]
pub struct WeightRegistry {
    current: RwLock<Arc<WeightVector>>,
}

impl Default for WeightRegistry {
    fn default() -> Self {
        Self::new(WeightVector::default())
    }
}

impl WeightRegistry {
    pub fn new(initial: WeightVector) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    pub fn snapshot(&self) -> Arc<WeightVector> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version
    }

    /// Make `next` the current vector.
    ///
    /// Republishing the current vector is a no-op. A different vector must
    /// carry a strictly greater version and pass validation.
    pub fn publish(&self, next: WeightVector) -> ParaResult<Arc<WeightVector>> {
        next.validate()
            .map_err(|reason| LearningError::InvalidWeights { reason })?;

        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        if **guard == next {
            return Ok(Arc::clone(&guard));
        }
        if next.version <= guard.version {
            return Err(LearningError::InvalidWeights {
                reason: format!(
                    "version {} does not advance current version {}",
                    next.version, guard.version
                ),
            }
            .into());
        }

        info!(
            from = guard.version,
            to = next.version,
            semantic = next.global.semantic,
            generative = next.global.generative,
            "weight vector swapped"
        );
        let next = Arc::new(next);
        *guard = Arc::clone(&next);
        Ok(next)
    }
}
