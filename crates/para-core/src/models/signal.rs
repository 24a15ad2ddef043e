use serde::{Deserialize, Serialize};

use crate::category::Category;

use super::{CategoryScore, GenerativeResult};

/// Outcome of a semantic index query. An unreachable store is never
/// reported as an empty score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SemanticSignal {
    Available { scores: CategoryScore },
    Unavailable { reason: String },
}

impl SemanticSignal {
    pub fn available(scores: CategoryScore) -> Self {
        Self::Available { scores }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn scores(&self) -> Option<&CategoryScore> {
        match self {
            Self::Available { scores } => Some(scores),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Top category of an available signal.
    pub fn top_category(&self) -> Option<&Category> {
        self.scores().and_then(|s| s.top()).map(|(c, _)| c)
    }
}

/// Outcome of the generative classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerativeSignal {
    Available { result: GenerativeResult },
    Unavailable { reason: String },
}

impl GenerativeSignal {
    pub fn available(result: GenerativeResult) -> Self {
        Self::Available { result }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn result(&self) -> Option<&GenerativeResult> {
        match self {
            Self::Available { result } => Some(result),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    pub fn category(&self) -> Option<&Category> {
        self.result().map(|r| &r.category)
    }
}
