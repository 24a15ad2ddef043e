//! # para-engine
//!
//! The inbound surface of the workspace. [`ClassificationEngine`] wires the
//! feature extractor, embedding chain, semantic index, generative adapter,
//! consensus resolver and feedback store together:
//!
//! - `classify` builds a [`ClassificationPlan`](para_plan::ClassificationPlan),
//!   running notes concurrently and both signals of a note concurrently.
//! - `confirm` / `reject` move plan entries through review, writing feedback
//!   before any entry is marked applied.
//! - `recompute` folds new feedback into a new weight vector version.

pub mod builder;
pub mod engine;
mod learning;
pub mod plans;
mod review;

pub use builder::EngineBuilder;
pub use engine::ClassificationEngine;
pub use plans::{PlanRegistry, StagedNote};
pub use para_plan::{ClassificationPlan, EntryState, PlanMode, PlanSummary};
