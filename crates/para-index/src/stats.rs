//! Index distribution diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use para_core::Category;

/// Stored vector counts per configured category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub per_category: BTreeMap<Category, u64>,
    pub total: u64,
}

impl IndexStats {
    pub fn count(&self, category: &Category) -> u64 {
        self.per_category.get(category).copied().unwrap_or(0)
    }

    /// Share of the index held by `category`, 0 for an empty index.
    pub fn share(&self, category: &Category) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(category) as f64 / self.total as f64
    }

    /// The largest category and its share. Ties go to the smaller label.
    pub fn dominant(&self) -> Option<(&Category, f64)> {
        let (category, _) = self
            .per_category
            .iter()
            .filter(|(_, n)| **n > 0)
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))?;
        Some((category, self.share(category)))
    }
}

/// Whether one category dominates the index enough to bias votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceReport {
    pub dominant: Option<Category>,
    pub dominant_share: f64,
    pub threshold: f64,
    pub imbalanced: bool,
    /// Configured categories with no stored vectors.
    pub empty_categories: Vec<Category>,
}
