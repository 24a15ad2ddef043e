//! Per-component degradation log.
//!
//! A component ("semantic-index", "generative", "embeddings") is either
//! healthy or degraded. Failures of an already degraded component with the
//! same fallback extend its open entry, so a batch run against a dead
//! backend produces one entry with a count rather than one per note.

use chrono::{DateTime, Utc};
use para_core::models::DegradationEvent;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    /// First failure of the episode; `failure` is overwritten by the latest.
    pub event: DegradationEvent,
    pub occurrences: u32,
    pub last_seen: DateTime<Utc>,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

impl TrackedDegradation {
    pub fn is_active(&self) -> bool {
        self.recovery_status == RecoveryStatus::Active
    }
}

#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: Vec<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: DegradationEvent) {
        if let Some(open) = self.events.iter_mut().rev().find(|t| {
            t.is_active()
                && t.event.component == event.component
                && t.event.fallback_used == event.fallback_used
        }) {
            open.occurrences = open.occurrences.saturating_add(1);
            open.last_seen = event.timestamp;
            debug!(
                component = %event.component,
                occurrences = open.occurrences,
                "component still degraded"
            );
            open.event.failure = event.failure;
            return;
        }

        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        self.events.push(TrackedDegradation {
            last_seen: event.timestamp,
            event,
            occurrences: 1,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Close every open entry of `component`. Returns whether any was open.
    pub fn mark_recovered(&mut self, component: &str) -> bool {
        let now = Utc::now();
        let mut closed = 0u32;
        for tracked in self
            .events
            .iter_mut()
            .filter(|t| t.is_active() && t.event.component == component)
        {
            tracked.recovery_status = RecoveryStatus::Recovered;
            tracked.recovered_at = Some(now);
            closed += tracked.occurrences;
        }
        if closed > 0 {
            info!(component, failures = closed, "component recovered");
        }
        closed > 0
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events
            .iter()
            .any(|t| t.is_active() && t.event.component == component)
    }

    pub fn events(&self) -> &[TrackedDegradation] {
        &self.events
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events.iter().filter(|t| t.is_active()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_failures_extend_one_entry() {
        let mut tracker = DegradationTracker::new();
        for reason in ["timeout", "timeout", "connection refused"] {
            tracker.record(DegradationEvent::now("generative", reason, "semantic-only"));
        }
        assert_eq!(tracker.events().len(), 1);
        let open = &tracker.events()[0];
        assert_eq!(open.occurrences, 3);
        assert_eq!(open.event.failure, "connection refused");
    }

    #[test]
    fn different_fallback_opens_a_new_entry() {
        let mut tracker = DegradationTracker::new();
        tracker.record(DegradationEvent::now("embeddings", "ollama down", "tfidf"));
        tracker.record(DegradationEvent::now("embeddings", "tfidf failed", "none"));
        assert_eq!(tracker.active_degradations().len(), 2);
    }

    #[test]
    fn recovery_closes_the_episode() {
        let mut tracker = DegradationTracker::new();
        tracker.record(DegradationEvent::now("semantic-index", "locked", "generative-only"));
        tracker.record(DegradationEvent::now("generative", "timeout", "semantic-only"));

        assert!(tracker.mark_recovered("semantic-index"));
        assert!(!tracker.mark_recovered("semantic-index"));
        assert!(!tracker.is_degraded("semantic-index"));
        assert!(tracker.is_degraded("generative"));
        assert_eq!(tracker.events()[0].recovery_status, RecoveryStatus::Recovered);

        tracker.record(DegradationEvent::now("semantic-index", "locked", "generative-only"));
        assert_eq!(tracker.events().len(), 3);
    }
}
