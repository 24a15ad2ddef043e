//! Generative confidence calibration.
//!
//! Raw confidences are bucketed into equal-width bins; each bin's observed
//! accuracy becomes a knot at the bin midpoint. Sparse bins keep the
//! identity value. Pool-adjacent-violators then makes the knots monotone.

use para_core::config::LearningConfig;
use para_core::models::CalibrationPoint;
use para_core::{CalibrationCurve, FeedbackRecord, WeightVector};

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    hits: usize,
    count: usize,
}

/// Fit a calibration curve to every record in `history` that carries a
/// generative answer and a ground truth. Pure function of the window.
pub fn calibration_curve(history: &[FeedbackRecord], params: &LearningConfig) -> CalibrationCurve {
    let n_buckets = params.calibration_buckets.max(1);
    let mut buckets = vec![Bucket::default(); n_buckets];

    for r in history {
        let (Some(gen), Some(confirmed)) = (r.decision.generative.result(), r.confirmed.as_ref())
        else {
            continue;
        };
        let idx = ((gen.confidence.clamp(0.0, 1.0) * n_buckets as f64) as usize).min(n_buckets - 1);
        buckets[idx].count += 1;
        if gen.category == *confirmed {
            buckets[idx].hits += 1;
        }
    }

    if buckets.iter().all(|b| b.count < params.min_bucket_samples.max(1)) {
        return CalibrationCurve::identity();
    }

    let width = 1.0 / n_buckets as f64;
    let mut knots: Vec<(f64, f64, f64)> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let mid = (i as f64 + 0.5) * width;
            if b.count >= params.min_bucket_samples.max(1) {
                (mid, b.hits as f64 / b.count as f64, b.count as f64)
            } else {
                // Sparse: identity, weighted as a single observation.
                (mid, mid, 1.0)
            }
        })
        .collect();

    pool_adjacent_violators(&mut knots);

    let mut points = vec![CalibrationPoint {
        raw: 0.0,
        calibrated: 0.0,
    }];
    points.extend(knots.into_iter().map(|(raw, calibrated, _)| CalibrationPoint {
        raw,
        calibrated: calibrated.clamp(0.0, 1.0),
    }));
    CalibrationCurve { points }
}

/// Refit the calibration curve. An unchanged curve returns `previous` as is.
pub fn recompute_calibration(
    history: &[FeedbackRecord],
    previous: &WeightVector,
    params: &LearningConfig,
) -> WeightVector {
    let curve = calibration_curve(history, params);
    if curve == previous.calibration {
        return previous.clone();
    }
    let mut next = previous.clone();
    next.calibration = curve;
    next.version = previous.version + 1;
    if let Some(latest) = history.iter().map(|r| r.recorded_at).max() {
        next.updated_at = next.updated_at.max(latest);
    }
    next
}

/// In-place weighted isotonic regression over `(x, y, weight)` knots sorted by x.
fn pool_adjacent_violators(knots: &mut [(f64, f64, f64)]) {
    // Blocks of (start, end, mean, weight).
    let mut blocks: Vec<(usize, usize, f64, f64)> = Vec::with_capacity(knots.len());
    for (i, &(_, y, w)) in knots.iter().enumerate() {
        blocks.push((i, i, y, w));
        while blocks.len() >= 2 {
            let last = blocks[blocks.len() - 1];
            let prev = blocks[blocks.len() - 2];
            if prev.2 <= last.2 {
                break;
            }
            let weight = prev.3 + last.3;
            let mean = (prev.2 * prev.3 + last.2 * last.3) / weight;
            blocks.truncate(blocks.len() - 2);
            blocks.push((prev.0, last.1, mean, weight));
        }
    }
    for (start, end, mean, _) in blocks {
        for knot in &mut knots[start..=end] {
            knot.1 = mean;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pav_merges_violations() {
        let mut knots = vec![(0.1, 0.3, 1.0), (0.2, 0.1, 1.0), (0.3, 0.5, 1.0)];
        pool_adjacent_violators(&mut knots);
        assert!((knots[0].1 - 0.2).abs() < 1e-12);
        assert!((knots[1].1 - 0.2).abs() < 1e-12);
        assert!((knots[2].1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pav_respects_weights() {
        let mut knots = vec![(0.1, 0.9, 3.0), (0.2, 0.1, 1.0)];
        pool_adjacent_violators(&mut knots);
        assert!((knots[0].1 - 0.7).abs() < 1e-12);
        assert!((knots[1].1 - 0.7).abs() < 1e-12);
    }

    #[test]
    fn empty_history_is_identity() {
        assert!(calibration_curve(&[], &LearningConfig::default()).is_identity());
    }
}
