//! Builders for the shared data model.

use chrono::{DateTime, Duration, Utc};

use para_core::config::CategoriesConfig;
use para_core::models::{CategoryScore, CategoryVote};
use para_core::{
    Category, CategorySet, Decision, DecisionOutcome, FeatureSummary, FeedbackRecord,
    FeedbackSource, GenerativeResult, GenerativeSignal, SemanticSignal,
};

pub const PARA_LABELS: [&str; 4] = ["Projects", "Areas", "Resources", "Archive"];

/// The default PARA category set with its alias table.
pub fn para_categories() -> CategorySet {
    CategoriesConfig::default()
        .to_set()
        .expect("default categories are valid")
}

/// Available semantic signal; every listed category gets one neighbor.
pub fn semantic(entries: &[(&str, f64)]) -> SemanticSignal {
    let votes = entries
        .iter()
        .map(|(c, s)| {
            (
                Category::new(*c),
                CategoryVote {
                    score: *s,
                    neighbors: 1,
                },
            )
        })
        .collect();
    SemanticSignal::available(CategoryScore {
        votes,
        neighbors_considered: entries.len(),
    })
}

pub fn generative(category: &str, confidence: f64) -> GenerativeSignal {
    GenerativeSignal::available(GenerativeResult::new(category, confidence))
}

/// A fixed reference time so decisions built in tests are reproducible.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default() + Duration::days(20_000)
}

/// A consensus decision whose semantic top is `sem`, generative answer is
/// `gen`, and final category is `chosen`.
pub fn decision(note_id: &str, sem: &str, gen: &str, chosen: &str) -> Decision {
    Decision {
        id: format!("decision-{note_id}"),
        note_id: note_id.to_string(),
        category: Some(Category::new(chosen)),
        confidence: 0.6,
        semantic: semantic(&[(sem, 0.5)]),
        generative: generative(gen, 0.8),
        discrepancy: sem != gen,
        outcome: DecisionOutcome::Consensus,
        features: FeatureSummary::default(),
        weight_version: 0,
        decided_at: epoch(),
    }
}

pub fn feedback(seq: u64, decision: Decision, confirmed: &str) -> FeedbackRecord {
    FeedbackRecord {
        seq,
        decision,
        confirmed: Some(Category::new(confirmed)),
        source: FeedbackSource::UserConfirmed,
        recorded_at: epoch() + Duration::seconds(seq as i64),
    }
}

/// `n` comparative feedback records where the generative signal is right
/// for the first `gen_accuracy` share of them and the semantic signal for
/// the first `sem_accuracy` share. Sequence numbers start at 1 and decision
/// times are distinct, so every record survives the store's dedup.
pub fn synthetic_history(n: usize, gen_accuracy: f64, sem_accuracy: f64) -> Vec<FeedbackRecord> {
    let gen_right = (n as f64 * gen_accuracy).round() as usize;
    let sem_right = (n as f64 * sem_accuracy).round() as usize;
    (0..n)
        .map(|i| {
            let truth = PARA_LABELS[i % PARA_LABELS.len()];
            let wrong = PARA_LABELS[(i + 1) % PARA_LABELS.len()];
            let gen = if i < gen_right { truth } else { wrong };
            let sem = if i < sem_right { truth } else { wrong };
            let mut d = decision(&format!("note-{i}"), sem, gen, gen);
            d.decided_at = epoch() + Duration::seconds(i as i64);
            feedback(i as u64 + 1, d, truth)
        })
        .collect()
}
