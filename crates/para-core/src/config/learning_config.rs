use serde::{Deserialize, Serialize};

use super::defaults;

/// Online learning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Number of most recent feedback records considered by a recompute.
    pub window: usize,
    /// Largest change to a source weight per recompute.
    pub max_step: f64,
    /// Floor for either source weight.
    pub min_weight: f64,
    /// Records a category needs before it gets its own weights.
    pub min_category_samples: usize,
    pub calibration_buckets: usize,
    /// Buckets with fewer samples keep the identity mapping.
    pub min_bucket_samples: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            window: defaults::DEFAULT_LEARNING_WINDOW,
            max_step: defaults::DEFAULT_MAX_WEIGHT_STEP,
            min_weight: defaults::DEFAULT_MIN_SOURCE_WEIGHT,
            min_category_samples: defaults::DEFAULT_MIN_CATEGORY_SAMPLES,
            calibration_buckets: defaults::DEFAULT_CALIBRATION_BUCKETS,
            min_bucket_samples: defaults::DEFAULT_MIN_BUCKET_SAMPLES,
        }
    }
}
