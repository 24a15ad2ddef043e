//! Span definitions per operation: classify, note, resolve, apply, learning, embedding.

/// Span around one batch classification run. `plan_id` is recorded once
/// the plan exists.
#[macro_export]
macro_rules! classify_span {
    ($notes:expr, $mode:expr) => {
        tracing::info_span!(
            "para.classify",
            plan_id = tracing::field::Empty,
            notes = $notes,
            mode = ?$mode
        )
    };
}

/// Span around the classification of a single note.
#[macro_export]
macro_rules! note_span {
    ($note_id:expr) => {
        tracing::debug_span!("para.note", note_id = %$note_id)
    };
}

/// Span around the consensus resolution of a single note.
#[macro_export]
macro_rules! resolve_span {
    ($note_id:expr, $weight_version:expr) => {
        tracing::debug_span!("para.resolve", note_id = %$note_id, weight_version = $weight_version)
    };
}

/// Span around the apply pass of a plan.
#[macro_export]
macro_rules! apply_span {
    ($plan_id:expr, $entries:expr) => {
        tracing::info_span!("para.apply", plan_id = %$plan_id, entries = $entries)
    };
}

/// Span around a learning recompute.
#[macro_export]
macro_rules! learning_span {
    ($window:expr, $from_version:expr) => {
        tracing::info_span!("para.learning", window = $window, from_version = $from_version)
    };
}

/// Span around an embedding call.
#[macro_export]
macro_rules! embedding_span {
    ($provider:expr, $dimension:expr) => {
        tracing::debug_span!("para.embedding", provider = %$provider, dimension = $dimension)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const CLASSIFY: &str = "para.classify";
    pub const NOTE: &str = "para.note";
    pub const RESOLVE: &str = "para.resolve";
    pub const APPLY: &str = "para.apply";
    pub const LEARNING: &str = "para.learning";
    pub const EMBEDDING: &str = "para.embedding";
}
