use serde::{Deserialize, Serialize};

use super::defaults;

/// Consensus resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Multiplier applied when only one signal is available.
    pub single_signal_penalty: f64,
    /// Blended scores closer than this are treated as tied.
    pub tie_epsilon: f64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            single_signal_penalty: defaults::DEFAULT_SINGLE_SIGNAL_PENALTY,
            tie_epsilon: defaults::DEFAULT_TIE_EPSILON,
        }
    }
}
