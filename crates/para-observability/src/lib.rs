//! # para-observability
//!
//! Structured logging for the classification engine: subscriber setup,
//! named spans, structured events, and degradation tracking.

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use tracing_setup::{init_tracing, init_tracing_json, init_tracing_with_filter};
