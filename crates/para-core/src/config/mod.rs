pub mod categories_config;
pub mod consensus_config;
pub mod defaults;
pub mod embedding_config;
pub mod engine_config;
pub mod generative_config;
pub mod index_config;
pub mod learning_config;
pub mod para_config;
pub mod storage_config;

pub use categories_config::CategoriesConfig;
pub use consensus_config::ConsensusConfig;
pub use embedding_config::EmbeddingConfig;
pub use engine_config::EngineConfig;
pub use generative_config::{GenerativeBackendConfig, GenerativeConfig};
pub use index_config::IndexConfig;
pub use learning_config::LearningConfig;
pub use para_config::{ConfigOverrides, ParaConfig};
pub use storage_config::StorageConfig;
