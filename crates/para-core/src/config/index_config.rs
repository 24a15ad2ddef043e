use serde::{Deserialize, Serialize};

use super::defaults;

/// Semantic index query configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Number of nearest neighbors that vote.
    pub k: usize,
    /// Share of the largest category above which the index is reported as imbalanced.
    pub imbalance_threshold: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            k: defaults::DEFAULT_NEIGHBORS_K,
            imbalance_threshold: defaults::DEFAULT_IMBALANCE_THRESHOLD,
        }
    }
}
