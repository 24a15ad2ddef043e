//! SemanticIndexClient: the engine's view of the vector store.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use para_core::errors::{PlanError, ParaResult};
use para_core::models::SemanticSignal;
use para_core::traits::{IVectorStore, VectorRecord};
use para_core::{Category, CategorySet};

use crate::aggregate::aggregate;
use crate::stats::{ImbalanceReport, IndexStats};

pub struct SemanticIndexClient {
    store: Arc<dyn IVectorStore>,
    categories: CategorySet,
    k: usize,
}

impl SemanticIndexClient {
    pub fn new(store: Arc<dyn IVectorStore>, categories: CategorySet, k: usize) -> Self {
        Self {
            store,
            categories,
            k: k.max(1),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Query with the configured neighbor count.
    pub fn query_default(&self, embedding: &[f32]) -> SemanticSignal {
        self.query(embedding, self.k)
    }

    /// Vote among the `k` nearest stored notes.
    ///
    /// A store failure yields `Unavailable`. An empty index is available
    /// with no votes. Never retries.
    pub fn query(&self, embedding: &[f32], k: usize) -> SemanticSignal {
        match self.store.nearest(embedding, k.max(1)) {
            Ok(neighbors) => {
                let scores = aggregate(&neighbors, &self.categories);
                debug!(
                    neighbors = neighbors.len(),
                    top = ?scores.top().map(|(c, s)| (c.as_str().to_string(), s)),
                    "semantic index queried"
                );
                SemanticSignal::available(scores)
            }
            Err(e) => {
                warn!(error = %e, "semantic index unavailable");
                SemanticSignal::unavailable(e.to_string())
            }
        }
    }

    /// Insert or replace the vector for `note_id` (last writer wins).
    pub fn upsert(
        &self,
        note_id: &str,
        embedding: Vec<f32>,
        category: &Category,
        content_hash: &str,
        metadata: serde_json::Value,
    ) -> ParaResult<()> {
        if !self.categories.contains(category) {
            return Err(PlanError::UnknownCategory {
                category: category.to_string(),
            }
            .into());
        }
        self.store.upsert_vector(&VectorRecord {
            note_id: note_id.to_string(),
            embedding,
            category: category.clone(),
            content_hash: content_hash.to_string(),
            metadata,
            updated_at: Utc::now(),
        })
    }

    /// Number of stored notes labelled `category`.
    pub fn stats(&self, category: &Category) -> ParaResult<u64> {
        Ok(self.distribution()?.count(category))
    }

    /// Counts for every configured category, zero-filled.
    pub fn distribution(&self) -> ParaResult<IndexStats> {
        let counts = self.store.count_by_category()?;
        let mut stats = IndexStats::default();
        for category in self.categories.iter() {
            let n = counts.get(category).copied().unwrap_or(0);
            stats.per_category.insert(category.clone(), n);
            stats.total += n;
        }
        Ok(stats)
    }

    /// Report whether the largest category exceeds `threshold` of the index.
    pub fn imbalance(&self, threshold: f64) -> ParaResult<ImbalanceReport> {
        let stats = self.distribution()?;
        let (dominant, dominant_share) = match stats.dominant() {
            Some((c, share)) => (Some(c.clone()), share),
            None => (None, 0.0),
        };
        let empty_categories = stats
            .per_category
            .iter()
            .filter(|(_, n)| **n == 0)
            .map(|(c, _)| c.clone())
            .collect();
        let imbalanced = dominant_share > threshold;
        if imbalanced {
            warn!(
                dominant = ?dominant.as_ref().map(Category::as_str),
                share = dominant_share,
                threshold,
                "semantic index is imbalanced"
            );
        }
        Ok(ImbalanceReport {
            dominant,
            dominant_share,
            threshold,
            imbalanced,
            empty_categories,
        })
    }
}
