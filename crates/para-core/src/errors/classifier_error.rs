use super::error_code::{self, ParaErrorCode};

/// Failures of the generative classifier adapter.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("no generative backend available: {reason}")]
    Unavailable { reason: String },

    #[error("malformed response from {backend}: {reason}")]
    MalformedResponse { backend: String, reason: String },

    #[error("backend {backend} timed out after {timeout_ms}ms")]
    Timeout { backend: String, timeout_ms: u64 },

    #[error("transport failure talking to {backend}: {reason}")]
    Transport { backend: String, reason: String },
}

impl ClassifierError {
    /// Failures that should move on to the next backend in the list.
    pub fn is_fallthrough(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport { .. })
    }
}

impl ParaErrorCode for ClassifierError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedResponse { .. } => error_code::MALFORMED_RESPONSE,
            _ => error_code::SIGNAL_UNAVAILABLE,
        }
    }
}
