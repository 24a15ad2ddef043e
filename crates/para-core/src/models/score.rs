use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Aggregated vote for one category across the nearest neighbors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryVote {
    /// Similarity-weighted score in [0, 1].
    pub score: f64,
    /// Number of neighbors labelled with this category.
    pub neighbors: usize,
}

/// Per-category similarity scores from one semantic index query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub votes: BTreeMap<Category, CategoryVote>,
    /// Number of neighbors the index returned for the query.
    pub neighbors_considered: usize,
}

impl CategoryScore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Score for `category`, zero when it received no votes.
    pub fn score(&self, category: &Category) -> f64 {
        self.votes.get(category).map_or(0.0, |v| v.score)
    }

    pub fn neighbors(&self, category: &Category) -> usize {
        self.votes.get(category).map_or(0, |v| v.neighbors)
    }

    pub fn is_empty(&self) -> bool {
        self.votes.values().all(|v| v.score <= 0.0)
    }

    /// Highest scoring category.
    ///
    /// Ties are broken by neighbor count (more wins), then by lexical label
    /// order (smaller wins). Categories with a zero score never win.
    pub fn top(&self) -> Option<(&Category, f64)> {
        self.ranked().into_iter().next()
    }

    /// All categories with a positive score, best first, using the same
    /// ordering as [`CategoryScore::top`].
    pub fn ranked(&self) -> Vec<(&Category, f64)> {
        let mut ranked: Vec<(&Category, &CategoryVote)> =
            self.votes.iter().filter(|(_, v)| v.score > 0.0).collect();
        ranked.sort_by(|(ca, va), (cb, vb)| {
            vb.score
                .partial_cmp(&va.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| vb.neighbors.cmp(&va.neighbors))
                .then_with(|| ca.cmp(cb))
        });
        ranked.into_iter().map(|(c, v)| (c, v.score)).collect()
    }
}
