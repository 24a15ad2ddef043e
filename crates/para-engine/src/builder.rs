//! EngineBuilder: assembles a [`ClassificationEngine`] from configuration,
//! with optional replacements for each outbound collaborator.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::info;

use para_consensus::{ConsensusResolver, WeightRegistry};
use para_core::errors::ParaResult;
use para_core::traits::{IEmbeddingProvider, ILearningStorage, IVectorStore};
use para_core::ParaConfig;
use para_embeddings::EmbeddingEngine;
use para_features::FeatureExtractor;
use para_generative::{build_backends, GenerativeBackend, GenerativeClassifier};
use para_index::SemanticIndexClient;
use para_learning::FeedbackStore;
use para_observability::DegradationTracker;
use para_storage::StorageEngine;

use crate::engine::{ClassificationEngine, EngineInner};
use crate::plans::PlanRegistry;

pub struct EngineBuilder {
    config: ParaConfig,
    root: Option<PathBuf>,
    vector_store: Option<Arc<dyn IVectorStore>>,
    learning_storage: Option<Arc<dyn ILearningStorage>>,
    backends: Option<Vec<Arc<dyn GenerativeBackend>>>,
    embedding_providers: Option<Vec<Box<dyn IEmbeddingProvider>>>,
    generative_timeout: Option<Duration>,
}

impl EngineBuilder {
    pub fn new(config: ParaConfig) -> Self {
        Self {
            config,
            root: None,
            vector_store: None,
            learning_storage: None,
            backends: None,
            embedding_providers: None,
            generative_timeout: None,
        }
    }

    /// Directory a relative `storage.db_path` is resolved against.
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = Some(root.as_ref().to_path_buf());
        self
    }

    pub fn with_vector_store(mut self, store: Arc<dyn IVectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    pub fn with_learning_storage(mut self, storage: Arc<dyn ILearningStorage>) -> Self {
        self.learning_storage = Some(storage);
        self
    }

    /// Use these generative backends, in order, instead of the configured ones.
    pub fn with_backends(mut self, backends: Vec<Arc<dyn GenerativeBackend>>) -> Self {
        self.backends = Some(backends);
        self
    }

    /// Use these embedding providers, highest priority first.
    pub fn with_embedding_providers(mut self, providers: Vec<Box<dyn IEmbeddingProvider>>) -> Self {
        self.embedding_providers = Some(providers);
        self
    }

    pub fn with_generative_timeout(mut self, timeout: Duration) -> Self {
        self.generative_timeout = Some(timeout);
        self
    }

    /// Validate the configuration and wire every subsystem.
    ///
    /// Collaborators not supplied explicitly share one SQLite storage
    /// engine at `storage.db_path` (in memory when unset). The current
    /// weight vector is loaded from learning storage.
    pub fn build(self) -> ParaResult<ClassificationEngine> {
        let config = self.config;
        config.validate()?;
        let categories = config.category_set()?;

        let (vector_store, learning_storage) = match (self.vector_store, self.learning_storage) {
            (Some(vectors), Some(learning)) => (vectors, learning),
            (vectors, learning) => {
                let shared = Arc::new(open_storage(&config, self.root.as_deref())?);
                (
                    vectors.unwrap_or_else(|| shared.clone() as Arc<dyn IVectorStore>),
                    learning.unwrap_or_else(|| shared.clone() as Arc<dyn ILearningStorage>),
                )
            }
        };

        let embeddings = match self.embedding_providers {
            Some(list) => EmbeddingEngine::from_providers(list, config.embeddings.l1_cache_size),
            None => EmbeddingEngine::new(&config.embeddings),
        };

        let backends = self
            .backends
            .unwrap_or_else(|| build_backends(&config.generative));
        let mut generative =
            GenerativeClassifier::new(backends, categories.clone(), &config.generative);
        if let Some(timeout) = self.generative_timeout {
            generative = generative.with_timeout(timeout);
        }

        let feedback = FeedbackStore::new(learning_storage, config.learning.clone());
        let weights = WeightRegistry::new(feedback.load_weights()?);

        info!(
            categories = %categories.joined(),
            weight_version = weights.version(),
            backends = ?generative.backend_names(),
            embedding_provider = embeddings.active_provider(),
            workers = config.engine.workers,
            "classification engine ready"
        );

        Ok(ClassificationEngine {
            inner: Arc::new(EngineInner {
                extractor: FeatureExtractor::new(&categories),
                index: SemanticIndexClient::new(vector_store, categories.clone(), config.index.k),
                resolver: ConsensusResolver::new(&config.consensus),
                engine_config: config.engine.clone(),
                index_config: config.index.clone(),
                categories,
                embeddings,
                generative,
                weights,
                feedback,
                plans: PlanRegistry::new(),
                degradation: Mutex::new(DegradationTracker::new()),
            }),
        })
    }
}

fn open_storage(config: &ParaConfig, root: Option<&Path>) -> ParaResult<StorageEngine> {
    match &config.storage.db_path {
        Some(path) => {
            let path = PathBuf::from(path);
            let path = match root {
                Some(root) if path.is_relative() => root.join(path),
                _ => path,
            };
            info!(path = %path.display(), "opening storage");
            StorageEngine::open(&path, config.storage.read_pool_size)
        }
        None => StorageEngine::open_in_memory(),
    }
}

