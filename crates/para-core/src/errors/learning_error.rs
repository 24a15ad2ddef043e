use super::error_code::{self, ParaErrorCode};

/// Errors from the feedback store and its exports.
#[derive(Debug, thiserror::Error)]
pub enum LearningError {
    #[error("export to {path} failed: {reason}")]
    ExportFailed { path: String, reason: String },

    #[error("import from {path} failed: {reason}")]
    ImportFailed { path: String, reason: String },

    #[error("invalid weight vector: {reason}")]
    InvalidWeights { reason: String },
}

impl ParaErrorCode for LearningError {
    fn error_code(&self) -> &'static str {
        error_code::LEARNING_ERROR
    }
}
