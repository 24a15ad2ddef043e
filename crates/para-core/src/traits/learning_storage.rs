use crate::errors::ParaResult;
use crate::models::{FeedbackRecord, WeightVector};

/// Durable state behind the learning feedback store.
pub trait ILearningStorage: Send + Sync {
    /// Append a record unless one with the same (note id, decision time)
    /// exists. Returns the assigned sequence number, or `None` for a duplicate.
    fn append_feedback(&self, record: &FeedbackRecord) -> ParaResult<Option<u64>>;

    /// The most recent `window` records in ascending sequence order.
    fn recent_feedback(&self, window: usize) -> ParaResult<Vec<FeedbackRecord>>;

    fn feedback_count(&self) -> ParaResult<u64>;

    /// Persist a weight vector version. Saving an existing version is a no-op.
    fn save_weights(&self, weights: &WeightVector) -> ParaResult<()>;

    /// Latest persisted version. A payload that cannot be decoded is a
    /// `ConfigError::CorruptWeights`.
    fn latest_weights(&self) -> ParaResult<Option<WeightVector>>;
}
