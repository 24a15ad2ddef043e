//! Degradation tracking for embedding and generative fallbacks.

mod tracker;

pub use tracker::{DegradationTracker, RecoveryStatus, TrackedDegradation};
