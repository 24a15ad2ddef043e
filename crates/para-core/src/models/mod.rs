//! Shared data model: notes, features, signals, decisions, weights, feedback.

mod decision;
mod degradation_event;
mod feature_summary;
mod feedback;
mod generative_result;
mod note;
mod score;
mod signal;
mod weights;

pub use decision::{Decision, DecisionOutcome};
pub use degradation_event::DegradationEvent;
pub use feature_summary::FeatureSummary;
pub use feedback::{FeedbackRecord, FeedbackSource};
pub use generative_result::GenerativeResult;
pub use note::{Note, NoteMetadata};
pub use score::{CategoryScore, CategoryVote};
pub use signal::{GenerativeSignal, SemanticSignal};
pub use weights::{CalibrationCurve, CalibrationPoint, SourceWeights, WeightVector};
