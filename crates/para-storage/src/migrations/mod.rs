//! Schema migrations tracked with `PRAGMA user_version`.

pub mod v001_note_vectors;
pub mod v002_feedback_log;
pub mod v003_weight_vectors;

use rusqlite::Connection;
use tracing::info;

use para_core::errors::{ParaError, ParaResult, StorageError};

/// Latest schema version known to this build.
pub const LATEST_VERSION: u32 = 3;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> ParaResult<()> {
    let current = current_version(conn)?;

    let migrations: &[(&str, u32)] = &[
        (v001_note_vectors::MIGRATION_SQL, 1),
        (v002_feedback_log::MIGRATION_SQL, 2),
        (v003_weight_vectors::MIGRATION_SQL, 3),
    ];

    for (sql, version) in migrations {
        if current >= *version {
            continue;
        }
        conn.execute_batch(sql)
            .map_err(|e| migration_err(*version, e))?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| migration_err(*version, e))?;
        info!(version = version, "applied migration");
    }
    Ok(())
}

/// Current schema version of the database.
pub fn current_version(conn: &Connection) -> ParaResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| migration_err(0, e))
}

fn migration_err(version: u32, e: rusqlite::Error) -> ParaError {
    ParaError::Storage(StorageError::MigrationFailed {
        version,
        reason: e.to_string(),
    })
}
