//! Source weight learning.
//!
//! Only comparative records count: both signals were available and a
//! ground truth exists. Each source is scored by how often it alone picked
//! the confirmed category, and the semantic share moves toward
//! `acc_sem / (acc_sem + acc_gen)` by at most `max_step` per recompute.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use para_core::config::LearningConfig;
use para_core::{Category, FeedbackRecord, SourceWeights, WeightVector};

use crate::calibration::calibration_curve;

/// Fold new feedback into the source weights.
///
/// Records at or below `previous.learned_through` are skipped, so running
/// this twice over the same history changes nothing the second time. With
/// no eligible records `previous` is returned unchanged.
pub fn recompute_weights(
    history: &[FeedbackRecord],
    previous: &WeightVector,
    params: &LearningConfig,
) -> WeightVector {
    let mut next = previous.clone();
    if apply_source_update(history, previous, params, &mut next) {
        next.version = previous.version + 1;
    }
    next
}

/// Source weights and calibration together, bumping the version once.
pub fn recompute(
    history: &[FeedbackRecord],
    previous: &WeightVector,
    params: &LearningConfig,
) -> WeightVector {
    let mut next = previous.clone();
    let mut changed = apply_source_update(history, previous, params, &mut next);

    let curve = calibration_curve(history, params);
    if curve != previous.calibration {
        next.calibration = curve;
        if let Some(latest) = history.iter().map(|r| r.recorded_at).max() {
            next.updated_at = next.updated_at.max(latest);
        }
        changed = true;
    }

    if changed {
        next.version = previous.version + 1;
    }
    next
}

/// Returns whether anything was folded in.
fn apply_source_update(
    history: &[FeedbackRecord],
    previous: &WeightVector,
    params: &LearningConfig,
    next: &mut WeightVector,
) -> bool {
    let eligible: Vec<&FeedbackRecord> = history
        .iter()
        .filter(|r| r.seq > previous.learned_through && r.is_comparative())
        .collect();
    if eligible.is_empty() {
        return false;
    }

    if let Some(target) = target_share(&eligible) {
        next.global = nudge(previous.global, target, params);
    }

    let mut by_category: BTreeMap<&Category, Vec<&FeedbackRecord>> = BTreeMap::new();
    for r in &eligible {
        if let Some(confirmed) = r.confirmed.as_ref() {
            by_category.entry(confirmed).or_default().push(r);
        }
    }
    for (category, records) in by_category {
        if records.len() < params.min_category_samples {
            continue;
        }
        if let Some(target) = target_share(&records) {
            let base = previous.weights_for(category);
            next.per_category
                .insert(category.clone(), nudge(base, target, params));
        }
    }

    next.learned_through = eligible
        .iter()
        .map(|r| r.seq)
        .max()
        .unwrap_or(previous.learned_through);
    next.sample_count = previous.sample_count + eligible.len() as u64;
    next.updated_at = latest(&eligible).unwrap_or(previous.updated_at);
    true
}

/// Target semantic share, `None` when neither source was ever right.
fn target_share(records: &[&FeedbackRecord]) -> Option<f64> {
    let n = records.len() as f64;
    let mut sem_hits = 0usize;
    let mut gen_hits = 0usize;
    for r in records {
        let Some(confirmed) = r.confirmed.as_ref() else {
            continue;
        };
        if r.decision.semantic_matches(confirmed) {
            sem_hits += 1;
        }
        if r.decision.generative_matches(confirmed) {
            gen_hits += 1;
        }
    }
    let acc_sem = sem_hits as f64 / n;
    let acc_gen = gen_hits as f64 / n;
    let total = acc_sem + acc_gen;
    (total > 0.0).then(|| acc_sem / total)
}

fn nudge(current: SourceWeights, target: f64, params: &LearningConfig) -> SourceWeights {
    let step = (target - current.semantic).clamp(-params.max_step, params.max_step);
    let semantic = (current.semantic + step).clamp(params.min_weight, 1.0 - params.min_weight);
    SourceWeights::from_semantic(semantic)
}

fn latest(records: &[&FeedbackRecord]) -> Option<DateTime<Utc>> {
    records.iter().map(|r| r.recorded_at).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use para_core::models::{CategoryScore, CategoryVote};
    use para_core::{
        Decision, DecisionOutcome, FeatureSummary, FeedbackSource, GenerativeResult,
        GenerativeSignal, SemanticSignal,
    };

    fn record(seq: u64, sem: &str, gen: &str, confirmed: &str) -> FeedbackRecord {
        let votes = [(
            Category::new(sem),
            CategoryVote {
                score: 0.5,
                neighbors: 1,
            },
        )]
        .into_iter()
        .collect();
        FeedbackRecord {
            seq,
            decision: Decision {
                id: format!("d{seq}"),
                note_id: format!("n{seq}"),
                category: Some(Category::new(gen)),
                confidence: 0.5,
                semantic: SemanticSignal::available(CategoryScore {
                    votes,
                    neighbors_considered: 1,
                }),
                generative: GenerativeSignal::available(GenerativeResult::new(gen, 0.8)),
                discrepancy: sem != gen,
                outcome: DecisionOutcome::Consensus,
                features: FeatureSummary::default(),
                weight_version: 0,
                decided_at: DateTime::<Utc>::default(),
            },
            confirmed: Some(Category::new(confirmed)),
            source: FeedbackSource::UserConfirmed,
            recorded_at: DateTime::<Utc>::default() + chrono::Duration::seconds(seq as i64),
        }
    }

    #[test]
    fn no_eligible_records_returns_previous() {
        let prev = WeightVector::default();
        assert_eq!(recompute_weights(&[], &prev, &LearningConfig::default()), prev);
    }

    #[test]
    fn step_is_bounded() {
        // Generative always right, semantic never: target share 0.
        let history: Vec<_> = (1..=10)
            .map(|i| record(i, "Areas", "Projects", "Projects"))
            .collect();
        let next = recompute_weights(&history, &WeightVector::default(), &LearningConfig::default());
        assert!((next.global.semantic - 0.4).abs() < 1e-12);
        assert_eq!(next.version, 1);
        assert_eq!(next.learned_through, 10);
        assert_eq!(next.sample_count, 10);
    }

    #[test]
    fn weights_stay_above_floor() {
        let params = LearningConfig {
            max_step: 1.0,
            ..Default::default()
        };
        let history: Vec<_> = (1..=10)
            .map(|i| record(i, "Areas", "Projects", "Projects"))
            .collect();
        let next = recompute_weights(&history, &WeightVector::default(), &params);
        assert!((next.global.semantic - params.min_weight).abs() < 1e-12);
    }

    #[test]
    fn watermark_makes_recompute_idempotent() {
        let history: Vec<_> = (1..=5)
            .map(|i| record(i, "Areas", "Projects", "Areas"))
            .collect();
        let params = LearningConfig::default();
        let once = recompute_weights(&history, &WeightVector::default(), &params);
        let twice = recompute_weights(&history, &once, &params);
        assert_eq!(once, twice);
    }

    #[test]
    fn categories_with_enough_samples_get_overrides() {
        let params = LearningConfig {
            min_category_samples: 3,
            ..Default::default()
        };
        let mut history: Vec<_> = (1..=3)
            .map(|i| record(i, "Areas", "Projects", "Areas"))
            .collect();
        history.push(record(4, "Resources", "Resources", "Resources"));
        let next = recompute_weights(&history, &WeightVector::default(), &params);
        let areas = next.per_category.get(&Category::new("Areas")).unwrap();
        assert!((areas.semantic - 0.6).abs() < 1e-12);
        assert!(!next.per_category.contains_key(&Category::new("Resources")));
    }

    #[test]
    fn neither_source_right_keeps_global_but_advances_watermark() {
        let history = vec![record(1, "Areas", "Projects", "Archive")];
        let next = recompute_weights(&history, &WeightVector::default(), &LearningConfig::default());
        assert_eq!(next.global, SourceWeights::equal());
        assert_eq!(next.learned_through, 1);
        assert_eq!(next.version, 1);
    }
}
