//! Read-only connections to a database file, handed out round-robin.
//! Under WAL they never wait on the writer.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use para_core::errors::ParaResult;

use super::pragmas::apply_read_pragmas;
use crate::{sqlite_err, to_storage_err};

const MAX_READERS: usize = 8;

pub struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open `size` readers, clamped to `1..=8`.
    pub fn open(path: &Path, size: usize) -> ParaResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connections = (0..size.clamp(1, MAX_READERS))
            .map(|_| {
                let conn = Connection::open_with_flags(path, flags).map_err(sqlite_err)?;
                apply_read_pragmas(&conn)?;
                Ok(Mutex::new(conn))
            })
            .collect::<ParaResult<Vec<_>>>()?;
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> ParaResult<T>
    where
        F: FnOnce(&Connection) -> ParaResult<T>,
    {
        let slot = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let conn = self.connections[slot]
            .lock()
            .map_err(|e| to_storage_err(format!("reader {slot} poisoned: {e}")))?;
        f(&conn)
    }

    pub fn size(&self) -> usize {
        self.connections.len()
    }
}
