//! Review transitions: the automatic apply pass, `confirm` and `reject`.
//!
//! Every transition checks the plan first, then appends feedback, and
//! only then marks the entry. A failed append leaves the entry untouched.

use tracing::{debug, info, warn};

use para_core::errors::{ParaResult, PlanError};
use para_core::traits::Cancellable;
use para_core::{CancellationToken, Category, FeedbackSource};
use para_plan::EntryState;

use crate::engine::{ClassificationEngine, EngineInner};

impl ClassificationEngine {
    /// Accept `category` as the ground truth for an entry and apply it.
    ///
    /// The label is normalized against the configured categories. Agreeing
    /// with the decision records `UserConfirmed`, anything else
    /// `UserCorrected`. Undecidable entries can only be applied this way.
    pub fn confirm(&self, entry_id: &str, category: &str) -> ParaResult<()> {
        let category = self
            .inner
            .categories
            .normalize(category)
            .ok_or_else(|| PlanError::UnknownCategory {
                category: category.to_string(),
            })?;
        self.inner.apply_entry(entry_id, category, None)
    }

    /// Reject an entry's proposal. The note keeps its current category,
    /// which is recorded as the ground truth when it has one.
    pub fn reject(&self, entry_id: &str) -> ParaResult<()> {
        self.inner.reject_entry(entry_id)
    }

    /// Apply every auto-apply candidate of `plan_id`, stopping between
    /// entries once `cancel` fires.
    pub(crate) fn apply_pass(&self, plan_id: &str, cancel: &CancellationToken) -> ParaResult<()> {
        let Some(plan) = self.inner.plans.get(plan_id) else {
            return Err(PlanError::UnknownEntry {
                entry_id: plan_id.to_string(),
            }
            .into());
        };
        let candidates = plan.auto_apply_candidates(
            self.inner.engine_config.auto_apply_min_confidence,
            self.inner.engine_config.require_review_on_discrepancy,
        );
        let _span = para_observability::apply_span!(plan_id, candidates.len()).entered();

        let mut applied = 0usize;
        for (position, entry_id) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(
                    applied,
                    remaining = candidates.len() - position,
                    "apply pass cancelled"
                );
                return Ok(());
            }
            let Some(category) = plan
                .entry(entry_id)
                .and_then(|e| e.decision.category.clone())
            else {
                continue;
            };
            match self
                .inner
                .apply_entry(entry_id, category, Some(FeedbackSource::AutoAccepted))
            {
                Ok(()) => applied += 1,
                Err(e) => warn!(entry_id, error = %e, "auto-apply failed, entry left for review"),
            }
        }
        info!(applied, "apply pass finished");
        Ok(())
    }
}

impl EngineInner {
    /// Move an entry to `Applied` as `category`.
    ///
    /// `source` is `None` for manual confirmations; it is then derived from
    /// whether `category` matches the decision.
    pub(crate) fn apply_entry(
        &self,
        entry_id: &str,
        category: Category,
        source: Option<FeedbackSource>,
    ) -> ParaResult<()> {
        let staged = self.plans.staged(entry_id);
        self.plans.with_plan_of(entry_id, |plan| -> ParaResult<()> {
            let entry = plan.check_transition(entry_id, EntryState::Applied)?;
            let decision = entry.decision.clone();
            let source = source.unwrap_or(if decision.category.as_ref() == Some(&category) {
                FeedbackSource::UserConfirmed
            } else {
                FeedbackSource::UserCorrected
            });

            let seq = self
                .feedback
                .append(&decision, Some(category.clone()), source)?;

            match staged.as_ref().and_then(|s| s.embedding.clone().map(|e| (e, s))) {
                Some((embedding, staged)) => {
                    let metadata = serde_json::json!({
                        "decision_id": decision.id,
                        "source": source.as_str(),
                    });
                    if let Err(e) = self.index.upsert(
                        &decision.note_id,
                        embedding,
                        &category,
                        &staged.content_hash,
                        metadata,
                    ) {
                        warn!(note_id = %decision.note_id, error = %e, "index upsert failed");
                    }
                }
                None => debug!(note_id = %decision.note_id, "no embedding staged, index not updated"),
            }

            plan.mark_applied(entry_id, category, seq)?;
            Ok(())
        })??;
        self.plans.release(entry_id);
        Ok(())
    }

    pub(crate) fn reject_entry(&self, entry_id: &str) -> ParaResult<()> {
        let current = self.plans.staged(entry_id).and_then(|s| s.current_category);
        self.plans.with_plan_of(entry_id, |plan| -> ParaResult<()> {
            let entry = plan.check_transition(entry_id, EntryState::Rejected)?;
            let decision = entry.decision.clone();
            let seq = self
                .feedback
                .append(&decision, current, FeedbackSource::Rejected)?;
            plan.mark_rejected(entry_id, seq)?;
            Ok(())
        })??;
        self.plans.release(entry_id);
        Ok(())
    }
}
