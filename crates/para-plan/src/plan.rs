//! ClassificationPlan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use para_core::errors::PlanError;
use para_core::{Category, Decision};

use crate::entry::{EntryState, PlanEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// Decisions only; nothing is applied or recorded.
    Preview,
    /// Eligible decisions are applied automatically; the rest await review.
    Apply,
}

/// Counts per entry state and review flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total: usize,
    pub proposed: usize,
    pub applied: usize,
    pub rejected: usize,
    pub undecidable: usize,
    pub discrepancies: usize,
    pub needs_review: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationPlan {
    pub id: String,
    pub mode: PlanMode,
    pub created_at: DateTime<Utc>,
    pub custom_instruction: Option<String>,
    /// One entry per input note, in input order.
    pub entries: Vec<PlanEntry>,
    /// Weight vector version the decisions were computed with.
    pub weight_version: u64,
}

impl ClassificationPlan {
    pub fn new(mode: PlanMode, custom_instruction: Option<String>, decisions: Vec<Decision>) -> Self {
        let weight_version = decisions.first().map_or(0, |d| d.weight_version);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mode,
            created_at: Utc::now(),
            custom_instruction,
            entries: decisions.into_iter().map(PlanEntry::new).collect(),
            weight_version,
        }
    }

    pub fn is_preview(&self) -> bool {
        self.mode == PlanMode::Preview
    }

    pub fn entry(&self, entry_id: &str) -> Option<&PlanEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    pub fn entry_ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    /// Check that `entry_id` may move to `to` without changing anything.
    /// Callers run this before writing feedback.
    pub fn check_transition(&self, entry_id: &str, to: EntryState) -> Result<&PlanEntry, PlanError> {
        if self.is_preview() {
            return Err(PlanError::PreviewOnly {
                plan_id: self.id.clone(),
            });
        }
        let entry = self.entry(entry_id).ok_or_else(|| PlanError::UnknownEntry {
            entry_id: entry_id.to_string(),
        })?;
        if !entry.state.can_transition(to) {
            return Err(PlanError::InvalidTransition {
                entry_id: entry_id.to_string(),
                from: entry.state.to_string(),
                to: to.to_string(),
            });
        }
        Ok(entry)
    }

    /// Record that the entry was applied as `category`. Takes the sequence
    /// returned by the feedback append, so an entry is never marked applied
    /// before its feedback is durable.
    pub fn mark_applied(
        &mut self,
        entry_id: &str,
        category: Category,
        feedback_seq: Option<u64>,
    ) -> Result<(), PlanError> {
        self.transition(entry_id, EntryState::Applied, Some(category), feedback_seq)
    }

    pub fn mark_rejected(&mut self, entry_id: &str, feedback_seq: Option<u64>) -> Result<(), PlanError> {
        self.transition(entry_id, EntryState::Rejected, None, feedback_seq)
    }

    fn transition(
        &mut self,
        entry_id: &str,
        to: EntryState,
        category: Option<Category>,
        feedback_seq: Option<u64>,
    ) -> Result<(), PlanError> {
        self.check_transition(entry_id, to)?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| PlanError::UnknownEntry {
                entry_id: entry_id.to_string(),
            })?;
        debug!(entry_id, from = %entry.state, to = %to, "plan entry transition");
        entry.state = to;
        entry.applied_category = category;
        entry.feedback_seq = feedback_seq;
        entry.updated_at = Utc::now();
        Ok(())
    }

    /// Entries an apply pass may accept without review.
    ///
    /// Undecidable entries never qualify. Discrepancies qualify only when
    /// review on discrepancy is not required.
    pub fn auto_apply_candidates(
        &self,
        min_confidence: f64,
        require_review_on_discrepancy: bool,
    ) -> Vec<String> {
        if self.is_preview() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| e.state == EntryState::Proposed)
            .filter(|e| e.decision.category.is_some())
            .filter(|e| !(require_review_on_discrepancy && e.decision.discrepancy))
            .filter(|e| e.decision.confidence >= min_confidence)
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn summary(&self) -> PlanSummary {
        let mut s = PlanSummary {
            total: self.entries.len(),
            ..Default::default()
        };
        for e in &self.entries {
            match e.state {
                EntryState::Proposed => s.proposed += 1,
                EntryState::Applied => s.applied += 1,
                EntryState::Rejected => s.rejected += 1,
                EntryState::Undecidable => s.undecidable += 1,
            }
            if e.decision.discrepancy {
                s.discrepancies += 1;
            }
            if !e.state.is_terminal() && e.needs_review() {
                s.needs_review += 1;
            }
        }
        s
    }
}
