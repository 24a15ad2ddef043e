//! PlanRegistry: plans produced by this engine, addressable by plan id and
//! by entry id.

use dashmap::DashMap;

use para_core::errors::PlanError;
use para_core::Category;
use para_plan::ClassificationPlan;

/// What an apply needs to know about a note beyond its decision.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedNote {
    /// Embedding computed during classification, if the embedding chain
    /// produced one. Written to the index when the entry is applied.
    pub embedding: Option<Vec<f32>>,
    pub content_hash: String,
    /// Category the note had before this run. Used as the ground truth of
    /// a rejection.
    pub current_category: Option<Category>,
}

/// Thread-safe plan registry.
#[derive(Default)]
pub struct PlanRegistry {
    plans: DashMap<String, ClassificationPlan>,
    /// entry id → plan id.
    entries: DashMap<String, String>,
    /// entry id → staged note. Only apply-mode plans stage notes.
    staged: DashMap<String, StagedNote>,
}

impl PlanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plan. `staged` pairs entry ids with their staged notes.
    pub fn insert(&self, plan: ClassificationPlan, staged: Vec<(String, StagedNote)>) {
        for entry in &plan.entries {
            self.entries.insert(entry.id.clone(), plan.id.clone());
        }
        for (entry_id, note) in staged {
            self.staged.insert(entry_id, note);
        }
        self.plans.insert(plan.id.clone(), plan);
    }

    /// Cloned snapshot of a plan.
    pub fn get(&self, plan_id: &str) -> Option<ClassificationPlan> {
        self.plans.get(plan_id).map(|p| p.clone())
    }

    pub fn plan_id_of(&self, entry_id: &str) -> Result<String, PlanError> {
        self.entries
            .get(entry_id)
            .map(|id| id.clone())
            .ok_or_else(|| PlanError::UnknownEntry {
                entry_id: entry_id.to_string(),
            })
    }

    /// Run `f` with exclusive access to the plan holding `entry_id`.
    pub fn with_plan_of<T>(
        &self,
        entry_id: &str,
        f: impl FnOnce(&mut ClassificationPlan) -> T,
    ) -> Result<T, PlanError> {
        let plan_id = self.plan_id_of(entry_id)?;
        let mut plan = self
            .plans
            .get_mut(&plan_id)
            .ok_or_else(|| PlanError::UnknownEntry {
                entry_id: entry_id.to_string(),
            })?;
        Ok(f(&mut plan))
    }

    pub fn staged(&self, entry_id: &str) -> Option<StagedNote> {
        self.staged.get(entry_id).map(|s| s.clone())
    }

    /// Drop the staged note of an entry that reached a terminal state.
    pub fn release(&self, entry_id: &str) {
        self.staged.remove(entry_id);
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn plan_ids(&self) -> Vec<String> {
        self.plans.iter().map(|r| r.key().clone()).collect()
    }

    /// Forget a plan and everything staged for it.
    pub fn remove(&self, plan_id: &str) -> Option<ClassificationPlan> {
        let (_, plan) = self.plans.remove(plan_id)?;
        for entry in &plan.entries {
            self.entries.remove(&entry.id);
            self.staged.remove(&entry.id);
        }
        Some(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use para_core::{Decision, DecisionOutcome, FeatureSummary, GenerativeSignal, SemanticSignal};
    use para_plan::PlanMode;

    fn undecided(note_id: &str) -> Decision {
        Decision {
            id: format!("d-{note_id}"),
            note_id: note_id.to_string(),
            category: None,
            confidence: 0.0,
            semantic: SemanticSignal::unavailable("down"),
            generative: GenerativeSignal::unavailable("down"),
            discrepancy: false,
            outcome: DecisionOutcome::Undecidable,
            features: FeatureSummary::default(),
            weight_version: 0,
            decided_at: Default::default(),
        }
    }

    #[test]
    fn entries_resolve_to_their_plan() {
        let registry = PlanRegistry::new();
        let plan = ClassificationPlan::new(PlanMode::Apply, None, vec![undecided("a"), undecided("b")]);
        let plan_id = plan.id.clone();
        let entry_id = plan.entries[1].id.clone();
        registry.insert(plan, vec![]);

        assert_eq!(registry.plan_id_of(&entry_id).unwrap(), plan_id);
        let note = registry.with_plan_of(&entry_id, |p| p.entry(&entry_id).map(|e| e.note_id.clone()));
        assert_eq!(note.unwrap().as_deref(), Some("b"));
        assert!(matches!(
            registry.plan_id_of("missing"),
            Err(PlanError::UnknownEntry { .. })
        ));
    }

    #[test]
    fn remove_drops_entries_and_staged_notes() {
        let registry = PlanRegistry::new();
        let plan = ClassificationPlan::new(PlanMode::Apply, None, vec![undecided("a")]);
        let plan_id = plan.id.clone();
        let entry_id = plan.entries[0].id.clone();
        registry.insert(
            plan,
            vec![(
                entry_id.clone(),
                StagedNote {
                    embedding: Some(vec![1.0]),
                    content_hash: "h".to_string(),
                    current_category: None,
                },
            )],
        );
        assert!(registry.staged(&entry_id).is_some());

        registry.remove(&plan_id).unwrap();
        assert!(registry.is_empty());
        assert!(registry.staged(&entry_id).is_none());
        assert!(registry.plan_id_of(&entry_id).is_err());
    }
}
