use serde::{Deserialize, Serialize};

use super::defaults;

/// Batch orchestration and apply policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Notes classified concurrently.
    pub workers: usize,
    /// Apply mode skips entries below this confidence.
    pub auto_apply_min_confidence: f64,
    /// Apply mode leaves discrepant entries for review.
    pub require_review_on_discrepancy: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: defaults::DEFAULT_WORKERS,
            auto_apply_min_confidence: defaults::DEFAULT_AUTO_APPLY_MIN_CONFIDENCE,
            require_review_on_discrepancy: defaults::DEFAULT_REQUIRE_REVIEW_ON_DISCREPANCY,
        }
    }
}
