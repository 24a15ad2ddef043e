//! # para-storage
//!
//! SQLite persistence: one serialized writer, a round-robin read pool,
//! `user_version` migrations, and query modules for note vectors, the
//! feedback log, and weight vector versions.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use para_core::errors::{ParaError, StorageError};

/// Wrap a message as a generic storage error.
pub(crate) fn to_storage_err(message: String) -> ParaError {
    ParaError::Storage(StorageError::Sqlite { message })
}

/// Map a rusqlite error, keeping lock contention distinguishable.
pub(crate) fn sqlite_err(e: rusqlite::Error) -> ParaError {
    match e.sqlite_error_code() {
        Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked) => {
            ParaError::Storage(StorageError::Busy {
                message: e.to_string(),
            })
        }
        _ => to_storage_err(e.to_string()),
    }
}
