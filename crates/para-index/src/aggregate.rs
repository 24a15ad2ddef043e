//! Neighbor vote aggregation.

use std::collections::BTreeMap;

use para_core::models::{CategoryScore, CategoryVote};
use para_core::traits::Neighbor;
use para_core::CategorySet;

/// Fold nearest neighbors into per-category scores.
///
/// `score[c]` is the sum of similarities of neighbors labelled `c` divided by
/// the number of neighbors returned, so scores across categories sum to at
/// most 1. Similarities are clamped to [0, 1]. Non-positive similarities and
/// labels outside `categories` contribute nothing.
pub fn aggregate(neighbors: &[Neighbor], categories: &CategorySet) -> CategoryScore {
    if neighbors.is_empty() {
        return CategoryScore::empty();
    }

    let total = neighbors.len() as f64;
    let mut votes: BTreeMap<_, CategoryVote> = BTreeMap::new();
    for n in neighbors {
        if !categories.contains(&n.category) {
            continue;
        }
        let sim = if n.similarity.is_nan() {
            0.0
        } else {
            n.similarity.clamp(0.0, 1.0)
        };
        if sim <= 0.0 {
            continue;
        }
        let vote = votes.entry(n.category.clone()).or_default();
        vote.score += sim / total;
        vote.neighbors += 1;
    }
    for vote in votes.values_mut() {
        vote.score = vote.score.clamp(0.0, 1.0);
    }

    CategoryScore {
        votes,
        neighbors_considered: neighbors.len(),
    }
}
