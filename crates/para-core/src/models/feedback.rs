use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;

use super::Decision;

/// How the ground truth for a decision was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    /// Applied automatically without review.
    AutoAccepted,
    /// A user confirmed the proposed category.
    UserConfirmed,
    /// A user chose a different category.
    UserCorrected,
    /// A user rejected the proposal; the note keeps its current category.
    Rejected,
}

impl FeedbackSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoAccepted => "auto_accepted",
            Self::UserConfirmed => "user_confirmed",
            Self::UserCorrected => "user_corrected",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto_accepted" => Some(Self::AutoAccepted),
            "user_confirmed" => Some(Self::UserConfirmed),
            "user_corrected" => Some(Self::UserCorrected),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// One append-only entry in the learning log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Monotonic sequence assigned by the store; 0 before insertion.
    pub seq: u64,
    pub decision: Decision,
    /// Ground truth. `None` when a rejected note had no prior category.
    pub confirmed: Option<Category>,
    pub source: FeedbackSource,
    pub recorded_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Whether the final decision matched the ground truth.
    pub fn was_correct(&self) -> Option<bool> {
        let confirmed = self.confirmed.as_ref()?;
        Some(self.decision.category.as_ref() == Some(confirmed))
    }

    /// Both signals carried evidence and a ground truth exists: the only
    /// records that say anything about relative source accuracy. A semantic
    /// signal without votes (empty index) carries none.
    pub fn is_comparative(&self) -> bool {
        self.confirmed.is_some()
            && self.decision.semantic.top_category().is_some()
            && self.decision.generative.is_available()
    }
}
