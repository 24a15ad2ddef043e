//! Error taxonomy. One enum per subsystem, aggregated by [`ParaError`].

pub mod classifier_error;
pub mod config_error;
pub mod embedding_error;
pub mod error_code;
pub mod learning_error;
pub mod plan_error;
pub mod storage_error;

pub use classifier_error::ClassifierError;
pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use error_code::ParaErrorCode;
pub use learning_error::LearningError;
pub use plan_error::PlanError;
pub use storage_error::StorageError;

/// Top-level error for every fallible operation in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum ParaError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("learning error: {0}")]
    Learning(#[from] LearningError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("operation cancelled")]
    Cancelled,
}

pub type ParaResult<T> = Result<T, ParaError>;

impl ParaErrorCode for ParaError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Classifier(e) => e.error_code(),
            Self::Embedding(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Plan(e) => e.error_code(),
            Self::Learning(e) => e.error_code(),
            Self::Serialization(_) => error_code::SERIALIZATION_ERROR,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
