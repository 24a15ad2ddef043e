//! Learning metrics snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use para_core::{Category, CategorySet, FeedbackRecord};

/// How one category fares as a prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    /// Records whose decision predicted this category.
    pub predicted: u64,
    /// Of those, how many were confirmed.
    pub correct: u64,
    /// Of those, how many were confirmed as something else.
    pub corrected: u64,
    /// Records whose ground truth is this category.
    pub confirmed: u64,
    pub precision: f64,
    pub correction_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningMetrics {
    pub total_records: u64,
    /// Final decisions that matched the ground truth.
    pub accuracy_rate: f64,
    /// The semantic top category alone matched the ground truth.
    pub semantic_accuracy: f64,
    /// The generative category alone matched the ground truth.
    pub generative_accuracy: f64,
    pub discrepancy_rate: f64,
    pub undecidable_rate: f64,
    /// Normalized entropy of confirmed categories: 1 is perfectly even.
    pub category_balance: f64,
    pub by_source: BTreeMap<String, u64>,
    pub per_category: BTreeMap<Category, CategoryPerformance>,
}

/// Compute metrics over `history`. An empty history gives all-zero metrics.
pub fn compute_metrics(history: &[FeedbackRecord], categories: &CategorySet) -> LearningMetrics {
    let mut m = LearningMetrics {
        total_records: history.len() as u64,
        ..Default::default()
    };
    if history.is_empty() {
        return m;
    }
    for c in categories.iter() {
        m.per_category.insert(c.clone(), CategoryPerformance::default());
    }

    let (mut judged, mut correct) = (0u64, 0u64);
    let (mut sem_judged, mut sem_correct) = (0u64, 0u64);
    let (mut gen_judged, mut gen_correct) = (0u64, 0u64);
    let (mut discrepancies, mut undecidable) = (0u64, 0u64);

    for r in history {
        *m.by_source.entry(r.source.as_str().to_string()).or_default() += 1;
        if r.decision.discrepancy {
            discrepancies += 1;
        }
        if r.decision.is_undecidable() {
            undecidable += 1;
        }

        let Some(confirmed) = r.confirmed.as_ref() else {
            continue;
        };
        judged += 1;
        if r.was_correct() == Some(true) {
            correct += 1;
        }
        // An empty index voted for nothing; it was neither right nor wrong.
        if r.decision.semantic.top_category().is_some() {
            sem_judged += 1;
            if r.decision.semantic_matches(confirmed) {
                sem_correct += 1;
            }
        }
        if r.decision.generative.is_available() {
            gen_judged += 1;
            if r.decision.generative_matches(confirmed) {
                gen_correct += 1;
            }
        }

        m.per_category.entry(confirmed.clone()).or_default().confirmed += 1;
        if let Some(predicted) = r.decision.category.as_ref() {
            let perf = m.per_category.entry(predicted.clone()).or_default();
            perf.predicted += 1;
            if predicted == confirmed {
                perf.correct += 1;
            } else {
                perf.corrected += 1;
            }
        }
    }

    for perf in m.per_category.values_mut() {
        perf.precision = ratio(perf.correct, perf.predicted);
        perf.correction_rate = ratio(perf.corrected, perf.predicted);
    }

    let total = history.len() as u64;
    m.accuracy_rate = ratio(correct, judged);
    m.semantic_accuracy = ratio(sem_correct, sem_judged);
    m.generative_accuracy = ratio(gen_correct, gen_judged);
    m.discrepancy_rate = ratio(discrepancies, total);
    m.undecidable_rate = ratio(undecidable, total);
    m.category_balance = balance(m.per_category.values().map(|p| p.confirmed));
    m
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Shannon entropy of `counts` divided by the maximum for that many bins.
fn balance(counts: impl Iterator<Item = u64>) -> f64 {
    let counts: Vec<u64> = counts.collect();
    let total: u64 = counts.iter().sum();
    if total == 0 || counts.len() < 2 {
        return 0.0;
    }
    let entropy: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.ln()
        })
        .sum();
    entropy / (counts.len() as f64).ln()
}
