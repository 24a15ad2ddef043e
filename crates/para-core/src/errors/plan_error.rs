use super::error_code::{self, ParaErrorCode};

/// Errors raised by classification plan transitions.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("unknown plan entry: {entry_id}")]
    UnknownEntry { entry_id: String },

    #[error("entry {entry_id} cannot move from {from} to {to}")]
    InvalidTransition {
        entry_id: String,
        from: String,
        to: String,
    },

    #[error("plan {plan_id} is a preview; confirmations are not accepted")]
    PreviewOnly { plan_id: String },

    #[error("category '{category}' is not configured")]
    UnknownCategory { category: String },
}

impl ParaErrorCode for PlanError {
    fn error_code(&self) -> &'static str {
        error_code::PLAN_ERROR
    }
}
