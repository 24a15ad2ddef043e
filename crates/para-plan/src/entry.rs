//! Plan entries and their states.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use para_core::{Category, Decision};

/// Review state of one plan entry.
///
/// `Proposed` and `Undecidable` may move to `Applied` or `Rejected`;
/// those two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    Proposed,
    Applied,
    Rejected,
    /// No category could be decided; only a manual confirmation applies it.
    Undecidable,
}

impl EntryState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Applied | Self::Rejected)
    }

    pub fn can_transition(self, to: EntryState) -> bool {
        matches!(
            (self, to),
            (Self::Proposed | Self::Undecidable, Self::Applied | Self::Rejected)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Applied => "applied",
            Self::Rejected => "rejected",
            Self::Undecidable => "undecidable",
        }
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub id: String,
    pub note_id: String,
    pub decision: Decision,
    pub state: EntryState,
    /// Category the note ended up with once applied.
    pub applied_category: Option<Category>,
    /// Sequence of the feedback record written for this entry. `None` after
    /// a transition whose feedback was already on file.
    pub feedback_seq: Option<u64>,
    pub updated_at: DateTime<Utc>,
}

impl PlanEntry {
    pub fn new(decision: Decision) -> Self {
        let state = if decision.is_undecidable() {
            EntryState::Undecidable
        } else {
            EntryState::Proposed
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            note_id: decision.note_id.clone(),
            updated_at: decision.decided_at,
            decision,
            state,
            applied_category: None,
            feedback_seq: None,
        }
    }

    pub fn needs_review(&self) -> bool {
        self.decision.needs_review()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        use EntryState::*;
        for from in [Proposed, Undecidable] {
            assert!(from.can_transition(Applied));
            assert!(from.can_transition(Rejected));
            assert!(!from.can_transition(Proposed));
        }
        for from in [Applied, Rejected] {
            assert!(from.is_terminal());
            for to in [Proposed, Applied, Rejected, Undecidable] {
                assert!(!from.can_transition(to));
            }
        }
        assert!(!Proposed.can_transition(Undecidable));
    }
}
