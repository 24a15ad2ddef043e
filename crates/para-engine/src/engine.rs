//! ClassificationEngine: batch classification.
//!
//! Notes run as tokio tasks bounded by a semaphore of `engine.workers`
//! permits. Within a note, embedding plus index query (blocking) runs on
//! `spawn_blocking` while the generative call runs on the task; the
//! resolver waits for both. Entries come back in input order. The apply
//! pass writes feedback and index rows, so it also runs on `spawn_blocking`.

use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn, Instrument};

use para_consensus::{ConsensusResolver, WeightRegistry};
use para_core::config::{EngineConfig, IndexConfig};
use para_core::errors::ParaResult;
use para_core::models::DegradationEvent;
use para_core::{
    CancellationToken, CategorySet, Decision, GenerativeSignal, Note, SemanticSignal, WeightVector,
};
use para_embeddings::EmbeddingEngine;
use para_features::FeatureExtractor;
use para_generative::GenerativeClassifier;
use para_index::SemanticIndexClient;
use para_learning::FeedbackStore;
use para_observability::tracing_setup::events;
use para_observability::{DegradationTracker, TrackedDegradation};
use para_plan::{ClassificationPlan, PlanMode};

use crate::plans::{PlanRegistry, StagedNote};

pub(crate) struct EngineInner {
    pub(crate) engine_config: EngineConfig,
    pub(crate) index_config: IndexConfig,
    pub(crate) categories: CategorySet,
    pub(crate) extractor: FeatureExtractor,
    pub(crate) embeddings: EmbeddingEngine,
    pub(crate) index: SemanticIndexClient,
    pub(crate) generative: GenerativeClassifier,
    pub(crate) resolver: ConsensusResolver,
    pub(crate) weights: WeightRegistry,
    pub(crate) feedback: FeedbackStore,
    pub(crate) plans: PlanRegistry,
    pub(crate) degradation: Mutex<DegradationTracker>,
}

/// Cheap to clone; clones share every subsystem.
#[derive(Clone)]
pub struct ClassificationEngine {
    pub(crate) inner: Arc<EngineInner>,
}

struct NoteOutcome {
    decision: Decision,
    staged: StagedNote,
}

impl ClassificationEngine {
    /// Classify `notes` into a new plan.
    ///
    /// In [`PlanMode::Apply`] entries that need no review are applied once
    /// every decision exists.
    pub async fn classify(
        &self,
        notes: Vec<Note>,
        custom_instruction: Option<String>,
        mode: PlanMode,
    ) -> ParaResult<ClassificationPlan> {
        self.classify_with_cancel(notes, custom_instruction, mode, &CancellationToken::new())
            .await
    }

    /// Like [`classify`](Self::classify). Cancelling `cancel` stops the
    /// apply pass between entries; entries not yet reached stay `Proposed`.
    pub async fn classify_with_cancel(
        &self,
        notes: Vec<Note>,
        custom_instruction: Option<String>,
        mode: PlanMode,
        cancel: &CancellationToken,
    ) -> ParaResult<ClassificationPlan> {
        let span = para_observability::classify_span!(notes.len(), mode);
        let weights = self.inner.weights.snapshot();
        let note_count = notes.len();

        let outcomes = self
            .decide_all(notes, custom_instruction.clone(), weights)
            .instrument(span.clone())
            .await;

        let mut decisions = Vec::with_capacity(note_count);
        let mut staged = Vec::with_capacity(note_count);
        for outcome in outcomes {
            decisions.push(outcome.decision);
            staged.push(outcome.staged);
        }

        let plan = ClassificationPlan::new(mode, custom_instruction, decisions);
        span.record("plan_id", plan.id.as_str());
        let plan_id = plan.id.clone();
        let staged = match mode {
            PlanMode::Apply => plan
                .entries
                .iter()
                .map(|e| e.id.clone())
                .zip(staged)
                .collect(),
            PlanMode::Preview => Vec::new(),
        };
        let summary = plan.summary();
        self.inner.plans.insert(plan, staged);
        span.in_scope(|| {
            info!(
                total = summary.total,
                undecidable = summary.undecidable,
                discrepancies = summary.discrepancies,
                "classification plan built"
            )
        });

        if mode == PlanMode::Apply {
            let engine = self.clone();
            let pass_id = plan_id.clone();
            let cancel = cancel.clone();
            let span = span.clone();
            let pass = tokio::task::spawn_blocking(move || {
                span.in_scope(|| engine.apply_pass(&pass_id, &cancel))
            });
            match pass.await {
                Ok(result) => result?,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => return Err(para_core::errors::ParaError::Cancelled),
            }
        }

        self.inner
            .plans
            .get(&plan_id)
            .ok_or_else(|| para_core::errors::PlanError::UnknownEntry { entry_id: plan_id }.into())
    }

    async fn decide_all(
        &self,
        notes: Vec<Note>,
        custom_instruction: Option<String>,
        weights: Arc<WeightVector>,
    ) -> Vec<NoteOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.inner.engine_config.workers.max(1)));
        let instruction: Option<Arc<str>> = custom_instruction.map(Arc::from);
        let ids: Vec<(String, String)> = notes
            .iter()
            .map(|n| (n.id.clone(), n.content_hash()))
            .collect();

        let mut tasks = JoinSet::new();
        for (index, note) in notes.into_iter().enumerate() {
            let inner = Arc::clone(&self.inner);
            let semaphore = Arc::clone(&semaphore);
            let weights = Arc::clone(&weights);
            let instruction = instruction.clone();
            let span = para_observability::note_span!(note.id);
            tasks.spawn(
                async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    (index, inner.decide(note, weights, instruction).await)
                }
                .instrument(span),
            );
        }

        let mut slots: Vec<Option<NoteOutcome>> = (0..ids.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => warn!(error = %e, "note task failed"),
            }
        }

        slots
            .into_iter()
            .zip(ids)
            .map(|(slot, (note_id, content_hash))| {
                slot.unwrap_or_else(|| {
                    // A task that died still yields an entry for its note.
                    let decision = self.inner.resolver.resolve(
                        &note_id,
                        &Default::default(),
                        SemanticSignal::unavailable("classification task failed"),
                        GenerativeSignal::unavailable("classification task failed"),
                        &weights,
                    );
                    NoteOutcome {
                        decision,
                        staged: StagedNote {
                            embedding: None,
                            content_hash,
                            current_category: None,
                        },
                    }
                })
            })
            .collect()
    }

    pub fn plan(&self, plan_id: &str) -> Option<ClassificationPlan> {
        self.inner.plans.get(plan_id)
    }

    pub fn plans(&self) -> &PlanRegistry {
        &self.inner.plans
    }

    pub fn categories(&self) -> &CategorySet {
        &self.inner.categories
    }

    /// Snapshot of the weight vector new decisions use.
    pub fn current_weights(&self) -> Arc<WeightVector> {
        self.inner.weights.snapshot()
    }

    pub fn weight_version(&self) -> u64 {
        self.inner.weights.version()
    }

    /// Every degradation episode since the engine was built, open or closed.
    pub fn degradation_events(&self) -> Vec<TrackedDegradation> {
        self.inner.tracker().events().to_vec()
    }

    /// Components currently running on a fallback.
    pub fn degraded_components(&self) -> Vec<String> {
        let tracker = self.inner.tracker();
        let mut components: Vec<String> = tracker
            .active_degradations()
            .into_iter()
            .map(|t| t.event.component.clone())
            .collect();
        components.sort();
        components.dedup();
        components
    }
}

impl EngineInner {
    async fn decide(
        self: Arc<Self>,
        note: Note,
        weights: Arc<WeightVector>,
        instruction: Option<Arc<str>>,
    ) -> NoteOutcome {
        let features = self.extractor.extract(&note.text, &note.metadata);
        let text: Arc<str> = Arc::from(note.text.as_str());

        let semantic_task = {
            let inner = Arc::clone(&self);
            let text = Arc::clone(&text);
            tokio::task::spawn_blocking(move || inner.semantic_signal(&text))
        };
        let generative_call = self
            .generative
            .classify(&text, &features, instruction.as_deref());

        let (semantic, generative) = tokio::join!(semantic_task, generative_call);

        let (semantic, embedding) = semantic.unwrap_or_else(|e| {
            (
                SemanticSignal::unavailable(format!("semantic task failed: {e}")),
                None,
            )
        });
        match &semantic {
            SemanticSignal::Unavailable { reason } => {
                self.degrade("semantic-index", reason, "generative-only")
            }
            _ => self.recover("semantic-index"),
        }
        let generative = match generative {
            Ok(result) => {
                self.recover("generative");
                GenerativeSignal::available(result)
            }
            Err(e) => {
                let reason = e.to_string();
                self.degrade("generative", &reason, "semantic-only");
                GenerativeSignal::unavailable(reason)
            }
        };

        let decision = self
            .resolver
            .resolve(&note.id, &features, semantic, generative, &weights);
        events::decision_made(
            &decision.note_id,
            decision.category.as_ref().map(|c| c.as_str()),
            decision.confidence,
            decision.discrepancy,
        );
        if decision.discrepancy {
            if let (Some(sem), Some(gen)) = (
                decision.semantic.top_category(),
                decision.generative.category(),
            ) {
                events::discrepancy_detected(&decision.note_id, sem.as_str(), gen.as_str());
            }
        }

        NoteOutcome {
            decision,
            staged: StagedNote {
                embedding,
                content_hash: note.content_hash(),
                current_category: note.current_category,
            },
        }
    }

    /// Embed and query. Blocking.
    fn semantic_signal(&self, text: &str) -> (SemanticSignal, Option<Vec<f32>>) {
        let embedded = self.embeddings.embed_text(text);
        for event in self.embeddings.drain_degradation_events() {
            self.tracker().record(event);
        }
        match embedded {
            Ok(embedded) => {
                let signal = self.index.query_default(&embedded.vector);
                (signal, Some(embedded.vector))
            }
            Err(e) => (
                SemanticSignal::unavailable(format!("embedding failed: {e}")),
                None,
            ),
        }
    }

    fn degrade(&self, component: &str, failure: &str, fallback: &str) {
        self.tracker()
            .record(DegradationEvent::now(component, failure, fallback));
    }

    fn recover(&self, component: &str) {
        let mut tracker = self.tracker();
        if tracker.is_degraded(component) {
            tracker.mark_recovered(component);
        }
    }

    pub(crate) fn tracker(&self) -> std::sync::MutexGuard<'_, DegradationTracker> {
        self.degradation.lock().unwrap_or_else(|e| e.into_inner())
    }
}
