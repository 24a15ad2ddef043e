//! Structured log events for key engine operations.

/// A note received a decision.
pub fn decision_made(note_id: &str, category: Option<&str>, confidence: f64, discrepancy: bool) {
    tracing::info!(
        event = "decision_made",
        note_id = %note_id,
        category = category.unwrap_or("<undecidable>"),
        confidence = confidence,
        discrepancy = discrepancy,
        "decision made"
    );
}

/// The two signals disagreed on a note.
pub fn discrepancy_detected(note_id: &str, semantic: &str, generative: &str) {
    tracing::warn!(
        event = "discrepancy_detected",
        note_id = %note_id,
        semantic = %semantic,
        generative = %generative,
        "signals disagree"
    );
}

/// A feedback record was appended.
pub fn feedback_recorded(note_id: &str, source: &str, seq: u64) {
    tracing::info!(
        event = "feedback_recorded",
        note_id = %note_id,
        source = %source,
        seq = seq,
        "feedback recorded"
    );
}

/// A new weight vector version was published.
pub fn weights_published(version: u64, semantic: f64, generative: f64, samples: u64) {
    tracing::info!(
        event = "weights_published",
        version = version,
        semantic = semantic,
        generative = generative,
        samples = samples,
        "weight vector published"
    );
}

/// A subsystem fell back to a lower-quality mode.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}
