//! FeedbackStore: the durable side of learning.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use para_core::config::LearningConfig;
use para_core::errors::ParaResult;
use para_core::traits::ILearningStorage;
use para_core::{Category, CategorySet, Decision, FeedbackRecord, FeedbackSource, WeightVector};
use para_observability::tracing_setup::events;

use crate::export;
use crate::metrics::{compute_metrics, LearningMetrics};
use crate::weights;

pub struct FeedbackStore {
    storage: Arc<dyn ILearningStorage>,
    config: LearningConfig,
}

impl FeedbackStore {
    pub fn new(storage: Arc<dyn ILearningStorage>, config: LearningConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Append feedback for `decision`. Returns the sequence number, or
    /// `None` when feedback for this (note, decision time) already exists.
    pub fn append(
        &self,
        decision: &Decision,
        confirmed: Option<Category>,
        source: FeedbackSource,
    ) -> ParaResult<Option<u64>> {
        let record = FeedbackRecord {
            seq: 0,
            decision: decision.clone(),
            confirmed,
            source,
            recorded_at: Utc::now(),
        };
        let seq = self.storage.append_feedback(&record)?;
        match seq {
            Some(seq) => events::feedback_recorded(&decision.note_id, source.as_str(), seq),
            None => info!(note_id = %decision.note_id, "duplicate feedback ignored"),
        }
        Ok(seq)
    }

    /// Whether a new record was appended.
    pub fn record(
        &self,
        decision: &Decision,
        confirmed: Option<Category>,
        source: FeedbackSource,
    ) -> ParaResult<bool> {
        Ok(self.append(decision, confirmed, source)?.is_some())
    }

    /// The configured window of most recent records, oldest first.
    pub fn history(&self) -> ParaResult<Vec<FeedbackRecord>> {
        self.storage.recent_feedback(self.config.window)
    }

    pub fn count(&self) -> ParaResult<u64> {
        self.storage.feedback_count()
    }

    /// Latest persisted weights, or the defaults when none exist or the
    /// stored vector fails validation. An undecodable payload is an error.
    pub fn load_weights(&self) -> ParaResult<WeightVector> {
        match self.storage.latest_weights()? {
            None => Ok(WeightVector::default()),
            Some(w) => match w.validate() {
                Ok(()) => Ok(w),
                Err(reason) => {
                    warn!(version = w.version, %reason, "stored weights invalid, using defaults");
                    Ok(WeightVector::default())
                }
            },
        }
    }

    pub fn save_weights(&self, weights: &WeightVector) -> ParaResult<()> {
        self.storage.save_weights(weights)
    }

    /// Sequence number of the newest local record, 0 for an empty log.
    pub fn latest_seq(&self) -> ParaResult<u64> {
        Ok(self
            .storage
            .recent_feedback(1)?
            .last()
            .map(|r| r.seq)
            .unwrap_or(0))
    }

    /// Rebase a vector read from another engine's export onto this log.
    ///
    /// Its `learned_through` counts the exporter's sequence numbers, which
    /// mean nothing here. The watermark moves to the newest local record,
    /// so local feedback recorded from now on is folded on top of the
    /// imported weights and nothing already in the log is folded twice.
    pub fn adopt_imported(&self, mut imported: WeightVector) -> ParaResult<WeightVector> {
        imported.learned_through = self.latest_seq()?;
        Ok(imported)
    }

    /// Fold the window into a new weight vector and persist it if it changed.
    pub fn recompute(&self, previous: &WeightVector) -> ParaResult<WeightVector> {
        let _span = para_observability::learning_span!(self.config.window, previous.version).entered();
        let history = self.history()?;
        let next = weights::recompute(&history, previous, &self.config);
        if next.version != previous.version {
            self.storage.save_weights(&next)?;
            events::weights_published(
                next.version,
                next.global.semantic,
                next.global.generative,
                next.sample_count,
            );
        }
        Ok(next)
    }

    pub fn metrics(&self, categories: &CategorySet) -> ParaResult<LearningMetrics> {
        Ok(compute_metrics(&self.history()?, categories))
    }

    /// Export every stored record as a JSONL fine-tune dataset.
    pub fn export_finetune_dataset(&self, path: &Path) -> ParaResult<usize> {
        let all = usize::try_from(self.storage.feedback_count()?).unwrap_or(usize::MAX);
        let records = self.storage.recent_feedback(all)?;
        export::export_finetune_dataset(&records, path)
    }
}
