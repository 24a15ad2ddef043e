//! Single write connection. All writes are serialized through it.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use para_core::errors::ParaResult;

use super::pragmas::apply_pragmas;
use crate::{sqlite_err, to_storage_err};

/// A single write connection behind a mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> ParaResult<Self> {
        let conn = Connection::open(path).map_err(sqlite_err)?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> ParaResult<Self> {
        let conn = Connection::open_in_memory().map_err(sqlite_err)?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and execute a closure with the connection.
    /// Callers on an async runtime should go through `spawn_blocking`.
    pub fn with_conn<F, T>(&self, f: F) -> ParaResult<T>
    where
        F: FnOnce(&Connection) -> ParaResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("write lock poisoned: {e}")))?;
        f(&guard)
    }
}
