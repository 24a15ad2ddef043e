use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::errors::ParaResult;

/// One labelled note embedding held by the semantic index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub note_id: String,
    pub embedding: Vec<f32>,
    pub category: Category,
    pub content_hash: String,
    /// Opaque caller metadata stored alongside the vector.
    pub metadata: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// A stored note returned by a nearest-neighbor query.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub note_id: String,
    pub category: Category,
    /// Cosine similarity to the query vector.
    pub similarity: f64,
}

/// Vector similarity store backing the semantic index.
pub trait IVectorStore: Send + Sync {
    /// Insert or replace the record for `record.note_id` (last writer wins).
    fn upsert_vector(&self, record: &VectorRecord) -> ParaResult<()>;

    /// The `k` most similar stored records, most similar first.
    fn nearest(&self, embedding: &[f32], k: usize) -> ParaResult<Vec<Neighbor>>;

    fn get_vector(&self, note_id: &str) -> ParaResult<Option<VectorRecord>>;

    /// Number of stored records per category label.
    fn count_by_category(&self) -> ParaResult<BTreeMap<Category, u64>>;
}
