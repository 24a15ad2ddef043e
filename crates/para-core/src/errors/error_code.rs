//! Stable error codes for callers that surface errors across a process boundary.

/// Every error enum implements this to provide a structured code string.
pub trait ParaErrorCode {
    /// Returns the error code (e.g. "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const WRITE_CONFLICT: &str = "STORE_WRITE_CONFLICT";
pub const SIGNAL_UNAVAILABLE: &str = "SIGNAL_UNAVAILABLE";
pub const MALFORMED_RESPONSE: &str = "MALFORMED_RESPONSE";
pub const EMBEDDING_ERROR: &str = "EMBEDDING_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PLAN_ERROR: &str = "PLAN_ERROR";
pub const LEARNING_ERROR: &str = "LEARNING_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
pub const CANCELLED: &str = "CANCELLED";
