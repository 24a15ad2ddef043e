//! Connection pragmas. Vector scans read every row of `note_vectors`, so
//! both sides get a large page cache and memory-mapped I/O.

use rusqlite::Connection;

use para_core::errors::ParaResult;

use crate::sqlite_err;

const SHARED: &str = "
    PRAGMA mmap_size = 268435456;
    PRAGMA cache_size = -64000;
    PRAGMA busy_timeout = 5000;
";

/// Writer: WAL journal with NORMAL sync on top of the shared settings.
pub fn apply_pragmas(conn: &Connection) -> ParaResult<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
        .map_err(sqlite_err)?;
    conn.execute_batch(SHARED).map_err(sqlite_err)
}

/// Readers cannot change the journal mode.
pub fn apply_read_pragmas(conn: &Connection) -> ParaResult<()> {
    conn.execute_batch(SHARED).map_err(sqlite_err)
}

pub fn verify_wal_mode(conn: &Connection) -> ParaResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(sqlite_err)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
