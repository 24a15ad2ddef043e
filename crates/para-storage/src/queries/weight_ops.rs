//! Weight vector version queries.

use rusqlite::{params, Connection, OptionalExtension};

use para_core::errors::{ConfigError, ParaResult};
use para_core::WeightVector;

use crate::sqlite_err;

/// Store a version. Versions are immutable, so re-saving one is ignored.
pub fn save_weights(conn: &Connection, weights: &WeightVector) -> ParaResult<()> {
    let payload = serde_json::to_string(weights)?;
    conn.execute(
        "INSERT OR IGNORE INTO weight_vectors (version, payload) VALUES (?1, ?2)",
        params![weights.version as i64, payload],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Highest stored version. An undecodable payload is fatal.
pub fn latest_weights(conn: &Connection) -> ParaResult<Option<WeightVector>> {
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT version, payload FROM weight_vectors ORDER BY version DESC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(sqlite_err)?;

    let Some((version, payload)) = row else {
        return Ok(None);
    };
    let weights = serde_json::from_str::<WeightVector>(&payload).map_err(|e| {
        ConfigError::CorruptWeights {
            location: format!("weight_vectors version {version}"),
            message: e.to_string(),
        }
    })?;
    Ok(Some(weights))
}

/// Number of stored versions.
pub fn version_count(conn: &Connection) -> ParaResult<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM weight_vectors", [], |row| row.get(0))
        .map_err(sqlite_err)?;
    Ok(count.max(0) as u64)
}
