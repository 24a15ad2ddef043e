//! # para-learning
//!
//! The learning feedback store: an append-only log of decisions and their
//! ground truth, plus the pure folds that turn that log into the next
//! [`WeightVector`](para_core::WeightVector) version.
//!
//! - [`weights`]: source weight learning with a watermark
//! - [`calibration`]: generative confidence calibration (pool-adjacent-violators)
//! - [`metrics`]: accuracy and balance snapshot
//! - [`export`]: weight vector files and the fine-tune dataset

pub mod calibration;
pub mod export;
pub mod metrics;
pub mod store;
pub mod weights;

pub use calibration::{calibration_curve, recompute_calibration};
pub use metrics::{compute_metrics, CategoryPerformance, LearningMetrics};
pub use store::FeedbackStore;
pub use weights::{recompute, recompute_weights};
