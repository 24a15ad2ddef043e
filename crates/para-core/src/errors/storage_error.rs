use super::error_code::{self, ParaErrorCode};

/// Persistence errors from the SQLite layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    #[error("database busy: {message}")]
    Busy { message: String },

    #[error("migration failed at v{version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("write conflict on {key}: {reason}")]
    WriteConflict { key: String, reason: String },

    #[error("corrupt record {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("io error at {path}: {reason}")]
    Io { path: String, reason: String },
}

impl ParaErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Busy { .. } => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::WriteConflict { .. } => error_code::WRITE_CONFLICT,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
