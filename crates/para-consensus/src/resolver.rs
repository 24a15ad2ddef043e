//! Signal blending.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::Utc;
use tracing::debug;

use para_core::config::ConsensusConfig;
use para_core::models::{
    CategoryScore, Decision, DecisionOutcome, GenerativeResult, GenerativeSignal, SemanticSignal,
};
use para_core::{Category, FeatureSummary, WeightVector};

/// Stateless resolver; all tunable state comes in through the weight vector.
#[derive(Debug, Clone)]
pub struct ConsensusResolver {
    single_signal_penalty: f64,
    tie_epsilon: f64,
}

impl Default for ConsensusResolver {
    fn default() -> Self {
        Self::new(&ConsensusConfig::default())
    }
}

impl ConsensusResolver {
    pub fn new(config: &ConsensusConfig) -> Self {
        Self {
            single_signal_penalty: config.single_signal_penalty,
            tie_epsilon: config.tie_epsilon,
        }
    }

    /// Produce the decision for one note. Never fails.
    ///
    /// A semantic signal that is available but carries no votes (an empty
    /// index) counts as no semantic evidence.
    pub fn resolve(
        &self,
        note_id: &str,
        features: &FeatureSummary,
        semantic: SemanticSignal,
        generative: GenerativeSignal,
        weights: &WeightVector,
    ) -> Decision {
        let _span = para_observability::resolve_span!(note_id, weights.version).entered();

        let scores = semantic.scores().filter(|s| !s.is_empty());
        let (category, confidence, outcome) = match (scores, generative.result()) {
            (Some(scores), Some(gen)) => self.blend(scores, gen, weights),
            (Some(scores), None) => match scores.top() {
                Some((c, s)) => (
                    Some(c.clone()),
                    s * self.single_signal_penalty,
                    DecisionOutcome::SemanticOnly,
                ),
                None => undecidable(),
            },
            (None, Some(gen)) => {
                let calibrated = weights.calibrate(gen.confidence);
                if calibrated > 0.0 {
                    (
                        Some(gen.category.clone()),
                        calibrated * self.single_signal_penalty,
                        DecisionOutcome::GenerativeOnly,
                    )
                } else {
                    undecidable()
                }
            }
            (None, None) => undecidable(),
        };

        let discrepancy = match (semantic.top_category(), generative.category()) {
            (Some(sem), Some(gen)) => sem != gen,
            _ => false,
        };

        debug!(
            ?category,
            confidence,
            ?outcome,
            discrepancy,
            "consensus resolved"
        );

        Decision {
            id: uuid::Uuid::new_v4().to_string(),
            note_id: note_id.to_string(),
            category,
            confidence: confidence.clamp(0.0, 1.0),
            semantic,
            generative,
            discrepancy,
            outcome,
            features: features.clone(),
            weight_version: weights.version,
            decided_at: Utc::now(),
        }
    }

    /// Weighted score of every category either signal named.
    pub fn blended_scores(
        &self,
        scores: &CategoryScore,
        gen: &GenerativeResult,
        weights: &WeightVector,
    ) -> BTreeMap<Category, f64> {
        let calibrated = weights.calibrate(gen.confidence);
        scores
            .votes
            .keys()
            .chain(std::iter::once(&gen.category))
            .map(|category| {
                let w = weights.weights_for(category);
                let gen_part = if *category == gen.category {
                    calibrated
                } else {
                    0.0
                };
                (
                    category.clone(),
                    w.semantic * scores.score(category) + w.generative * gen_part,
                )
            })
            .collect()
    }

    fn blend(
        &self,
        scores: &CategoryScore,
        gen: &GenerativeResult,
        weights: &WeightVector,
    ) -> (Option<Category>, f64, DecisionOutcome) {
        let blended = self.blended_scores(scores, gen, weights);

        let best = blended.values().copied().fold(f64::NEG_INFINITY, f64::max);
        if best <= 0.0 {
            return undecidable();
        }

        // BTreeMap order makes the final fallback lexical.
        let winner = blended
            .iter()
            .filter(|(_, b)| **b >= best - self.tie_epsilon)
            .max_by(|(ca, _), (cb, _)| {
                scores
                    .score(ca)
                    .partial_cmp(&scores.score(cb))
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| cb.cmp(ca))
            })
            .map(|(c, b)| (c.clone(), *b));

        match winner {
            Some((c, b)) => (Some(c), b, DecisionOutcome::Consensus),
            None => undecidable(),
        }
    }
}

fn undecidable() -> (Option<Category>, f64, DecisionOutcome) {
    (None, 0.0, DecisionOutcome::Undecidable)
}
