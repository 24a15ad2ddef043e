//! # para-plan
//!
//! A classification plan is the ordered list of per-note decisions from one
//! classify run. Each entry moves through a small state machine as it is
//! auto-applied, confirmed or rejected. Preview plans are read-only.

pub mod entry;
pub mod plan;

pub use entry::{EntryState, PlanEntry};
pub use plan::{ClassificationPlan, PlanMode, PlanSummary};
