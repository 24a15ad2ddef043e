//! StorageEngine: owns the ConnectionPool and implements IVectorStore and
//! ILearningStorage on top of it.

use std::collections::BTreeMap;
use std::path::Path;

use para_core::errors::ParaResult;
use para_core::models::{FeedbackRecord, WeightVector};
use para_core::traits::{ILearningStorage, IVectorStore, Neighbor, VectorRecord};
use para_core::Category;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{feedback_ops, vector_ops, weight_ops};

/// The main storage engine.
pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, read_pool_size: usize) -> ParaResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open(path, read_pool_size)?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for tests and previews).
    pub fn open_in_memory() -> ParaResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> ParaResult<()> {
        self.pool.writer.with_conn(migrations::run_migrations)
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn schema_version(&self) -> ParaResult<u32> {
        self.with_reader(migrations::current_version)
    }

    pub fn vector_count(&self) -> ParaResult<u64> {
        self.with_reader(vector_ops::count_vectors)
    }

    pub fn weight_version_count(&self) -> ParaResult<u64> {
        self.with_reader(weight_ops::version_count)
    }

    fn with_reader<F, T>(&self, f: F) -> ParaResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> ParaResult<T>,
    {
        self.pool.read(f)
    }
}

impl IVectorStore for StorageEngine {
    fn upsert_vector(&self, record: &VectorRecord) -> ParaResult<()> {
        self.pool
            .writer
            .with_conn(|conn| vector_ops::upsert_vector(conn, record))
    }

    fn nearest(&self, embedding: &[f32], k: usize) -> ParaResult<Vec<Neighbor>> {
        self.with_reader(|conn| vector_ops::nearest(conn, embedding, k))
    }

    fn get_vector(&self, note_id: &str) -> ParaResult<Option<VectorRecord>> {
        self.with_reader(|conn| vector_ops::get_vector(conn, note_id))
    }

    fn count_by_category(&self) -> ParaResult<BTreeMap<Category, u64>> {
        self.with_reader(vector_ops::count_by_category)
    }
}

impl ILearningStorage for StorageEngine {
    fn append_feedback(&self, record: &FeedbackRecord) -> ParaResult<Option<u64>> {
        self.pool
            .writer
            .with_conn(|conn| feedback_ops::append_feedback(conn, record))
    }

    fn recent_feedback(&self, window: usize) -> ParaResult<Vec<FeedbackRecord>> {
        self.with_reader(|conn| feedback_ops::recent_feedback(conn, window))
    }

    fn feedback_count(&self) -> ParaResult<u64> {
        self.with_reader(feedback_ops::feedback_count)
    }

    fn save_weights(&self, weights: &WeightVector) -> ParaResult<()> {
        self.pool
            .writer
            .with_conn(|conn| weight_ops::save_weights(conn, weights))
    }

    fn latest_weights(&self) -> ParaResult<Option<WeightVector>> {
        self.with_reader(weight_ops::latest_weights)
    }
}
