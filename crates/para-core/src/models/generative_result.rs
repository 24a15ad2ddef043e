use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Normalized output of the generative classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerativeResult {
    pub category: Category,
    /// Raw model confidence, clamped to [0, 1].
    pub confidence: f64,
    pub rationale: String,
    /// False when the reply had to be clamped into range.
    pub valid: bool,
    /// True when the answer came from the stricter repair request.
    #[serde(default)]
    pub repaired: bool,
    /// Name of the backend that produced the answer.
    #[serde(default)]
    pub backend: String,
}

impl GenerativeResult {
    pub fn new(category: impl Into<Category>, confidence: f64) -> Self {
        Self {
            category: category.into(),
            confidence: confidence.clamp(0.0, 1.0),
            rationale: String::new(),
            valid: (0.0..=1.0).contains(&confidence),
            repaired: false,
            backend: String::new(),
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }
}
