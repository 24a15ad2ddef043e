//! Connections: one serialized writer plus, for database files, a
//! round-robin set of read-only connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::warn;

use para_core::errors::ParaResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

pub struct ConnectionPool {
    pub writer: WriteConnection,
    /// `None` in memory: a second in-memory connection would be a separate
    /// empty database, so reads share the writer there.
    readers: Option<ReadPool>,
    db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// The writer opens first so the file exists and is in WAL mode before
    /// any read-only connection touches it.
    pub fn open(path: &Path, read_pool_size: usize) -> ParaResult<Self> {
        let writer = WriteConnection::open(path)?;
        if !writer.with_conn(pragmas::verify_wal_mode)? {
            warn!(path = %path.display(), "WAL unavailable, readers may wait on the writer");
        }
        let readers = ReadPool::open(path, read_pool_size)?;
        Ok(Self {
            writer,
            readers: Some(readers),
            db_path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> ParaResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory()?,
            readers: None,
            db_path: None,
        })
    }

    /// Run a read against the pool, or the writer when there is none.
    pub fn read<F, T>(&self, f: F) -> ParaResult<T>
    where
        F: FnOnce(&Connection) -> ParaResult<T>,
    {
        match &self.readers {
            Some(readers) => readers.with_conn(f),
            None => self.writer.with_conn(f),
        }
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn reader_count(&self) -> usize {
        self.readers.as_ref().map_or(0, ReadPool::size)
    }
}
