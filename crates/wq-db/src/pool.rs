//! SQLite connection wrapper.

use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Database error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Connection(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Connection lock poisoned: {0}")]
    Lock(String),
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Single-connection pool. The synthesis job reads sequentially, so one
/// connection behind a mutex is enough.
pub struct DbPool {
    conn: Mutex<Connection>,
}

impl DbPool {
    /// Open an existing database file without write access. No pragmas are
    /// issued, so the file header and journal mode stay as they are.
    pub fn open_read_only(path: &Path) -> DbResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Run `f` with shared access to the connection.
    pub fn with_conn<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.conn.lock().map_err(|e| DbError::Lock(e.to_string()))?;
        f(&conn)
    }

    /// Run `f` with exclusive access to the connection (migrations, transactions).
    pub fn with_conn_mut<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        let mut conn = self.conn.lock().map_err(|e| DbError::Lock(e.to_string()))?;
        f(&mut conn)
    }
}
