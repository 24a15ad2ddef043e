//! Learning and diagnostics operations of the engine.

use std::path::Path;

use tracing::info;

use para_core::errors::ParaResult;
use para_index::{ImbalanceReport, IndexStats};
use para_learning::export;
use para_learning::LearningMetrics;

use crate::engine::ClassificationEngine;

impl ClassificationEngine {
    /// Fold feedback recorded since the last recompute into a new weight
    /// vector and publish it. Returns the version now current; unchanged
    /// when there was nothing new to learn.
    pub fn recompute(&self) -> ParaResult<u64> {
        let previous = self.inner.weights.snapshot();
        let next = self.inner.feedback.recompute(&previous)?;
        let published = self.inner.weights.publish(next)?;
        Ok(published.version)
    }

    pub fn metrics(&self) -> ParaResult<LearningMetrics> {
        self.inner.feedback.metrics(&self.inner.categories)
    }

    pub fn export_weights(&self, path: &Path) -> ParaResult<()> {
        let current = self.inner.weights.snapshot();
        export::export_weights(&current, path)?;
        info!(version = current.version, path = %path.display(), "weights exported");
        Ok(())
    }

    /// Load a weight vector file and make it current.
    ///
    /// A file identical to the current vector changes nothing. Otherwise
    /// its contents are published as the next version, so decisions made
    /// afterwards match those of the exporting engine. The learning
    /// watermark is rebased onto the local feedback log.
    pub fn import_weights(&self, path: &Path) -> ParaResult<u64> {
        let read = export::import_weights(path)?;
        let mut imported = self.inner.feedback.adopt_imported(read)?;
        let current = self.inner.weights.snapshot();
        imported.version = current.version;
        if imported == *current {
            return Ok(current.version);
        }
        imported.version = current.version + 1;
        self.inner.feedback.save_weights(&imported)?;
        let published = self.inner.weights.publish(imported)?;
        info!(version = published.version, path = %path.display(), "weights imported");
        Ok(published.version)
    }

    pub fn export_finetune_dataset(&self, path: &Path) -> ParaResult<usize> {
        let written = self.inner.feedback.export_finetune_dataset(path)?;
        info!(records = written, path = %path.display(), "fine-tune dataset exported");
        Ok(written)
    }

    pub fn index_stats(&self) -> ParaResult<IndexStats> {
        self.inner.index.distribution()
    }

    /// Imbalance check at the configured threshold.
    pub fn index_imbalance(&self) -> ParaResult<ImbalanceReport> {
        self.inner
            .index
            .imbalance(self.inner.index_config.imbalance_threshold)
    }
}
