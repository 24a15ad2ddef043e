//! # para-core
//!
//! Foundation crate for the PARA classification engine.
//! Defines the category model, shared data types, traits, errors, config,
//! and constants. Every other crate in the workspace depends on this.

pub mod category;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use category::{Category, CategorySet};
pub use config::ParaConfig;
pub use errors::{ParaError, ParaResult};
pub use models::{
    CalibrationCurve, CategoryScore, Decision, DecisionOutcome, FeatureSummary, FeedbackRecord,
    FeedbackSource, GenerativeResult, GenerativeSignal, Note, NoteMetadata, SemanticSignal,
    SourceWeights, WeightVector,
};
pub use traits::{
    Cancellable, CancellationToken, IEmbeddingProvider, ILearningStorage, IVectorStore,
};
