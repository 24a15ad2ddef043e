use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;

use super::{FeatureSummary, GenerativeSignal, SemanticSignal};

/// Which evidence produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Both signals were available and blended.
    Consensus,
    SemanticOnly,
    GenerativeOnly,
    /// No signal produced a category.
    Undecidable,
}

/// The resolver's verdict for one note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub note_id: String,
    /// Final category, `None` when undecidable.
    pub category: Option<Category>,
    pub confidence: f64,
    pub semantic: SemanticSignal,
    pub generative: GenerativeSignal,
    /// Both signals available and their top categories disagree.
    pub discrepancy: bool,
    pub outcome: DecisionOutcome,
    pub features: FeatureSummary,
    /// Version of the weight vector used to compute this decision.
    pub weight_version: u64,
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    pub fn is_undecidable(&self) -> bool {
        self.outcome == DecisionOutcome::Undecidable
    }

    /// Whether a human should look at this decision before it is applied.
    pub fn needs_review(&self) -> bool {
        self.is_undecidable() || self.discrepancy
    }

    /// Whether the semantic signal alone would have picked `category`.
    pub fn semantic_matches(&self, category: &Category) -> bool {
        self.semantic.top_category() == Some(category)
    }

    /// Whether the generative signal alone would have picked `category`.
    pub fn generative_matches(&self, category: &Category) -> bool {
        self.generative.category() == Some(category)
    }
}
