//! Connection acquisition for SQLite stores.
//!
//! # Responsibility
//! - Define the per-operation connection contract used by every repository.
//! - Provide file-backed and in-memory store implementations.
//!
//! # Invariants
//! - Yielded connections have `foreign_keys=ON` and a busy timeout applied.
//! - A connection lives for one repository operation; release happens by drop
//!   on every exit path.

use super::{DbError, DbResult};
use log::{debug, error};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Yields one store connection per repository operation.
///
/// Implementations are cheap handles meant to be shared by reference across
/// repositories. Acquisition and configuration failures surface as
/// [`DbError::Connection`]; statement failures on the yielded connection are
/// the caller's to classify.
pub trait ConnectionProvider {
    fn connect(&self) -> DbResult<Connection>;
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    fn connect(&self) -> DbResult<Connection> {
        (**self).connect()
    }
}

/// File-backed store, opened fresh for every operation.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionProvider for FileStore {
    fn connect(&self) -> DbResult<Connection> {
        let conn = match Connection::open(&self.path) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_connect module=db status=error mode=file path={} error={}",
                    self.path.display(),
                    err
                );
                return Err(DbError::Connection(err));
            }
        };
        configure_connection(&conn)?;
        debug!(
            "event=db_connect module=db status=ok mode=file path={}",
            self.path.display()
        );
        Ok(conn)
    }
}

/// Private in-memory store whose connections all observe the same data.
///
/// Backed by a uniquely named shared-cache database; an internal keep-alive
/// connection pins the data for the lifetime of the store. Intended for tests
/// and ephemeral sessions.
pub struct MemoryStore {
    uri: String,
    _keepalive: Connection,
}

impl MemoryStore {
    pub fn new() -> DbResult<Self> {
        let uri = format!(
            "file:booktracker-{}?mode=memory&cache=shared",
            Uuid::new_v4().simple()
        );
        let keepalive = Connection::open(&uri).map_err(DbError::Connection)?;
        Ok(Self {
            uri,
            _keepalive: keepalive,
        })
    }
}

impl ConnectionProvider for MemoryStore {
    fn connect(&self) -> DbResult<Connection> {
        let conn = match Connection::open(&self.uri) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_connect module=db status=error mode=memory error={}",
                    err
                );
                return Err(DbError::Connection(err));
            }
        };
        configure_connection(&conn)?;
        debug!("event=db_connect module=db status=ok mode=memory");
        Ok(conn)
    }
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(DbError::Connection)?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(DbError::Connection)?;
    Ok(())
}
