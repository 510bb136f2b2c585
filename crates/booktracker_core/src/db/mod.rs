//! SQLite storage access and schema convergence entry points.
//!
//! # Responsibility
//! - Hand out configured connections through [`ConnectionProvider`]s.
//! - Converge pre-existing stores to the current schema on startup.
//!
//! # Invariants
//! - Every yielded connection enforces foreign keys.
//! - Connection acquisition failures are typed apart from statement failures.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod provider;
pub mod schema;

pub use provider::{ConnectionProvider, FileStore, MemoryStore};
pub use schema::{
    apply_startup_migrations, ensure_books_table, ensure_user_name_column, provision_base_tables,
    SchemaOutcome,
};

pub type DbResult<T> = Result<T, DbError>;

/// Store-level failure, split by where it surfaced.
#[derive(Debug)]
pub enum DbError {
    /// The store could not be reached, opened, or configured.
    Connection(rusqlite::Error),
    /// A statement failed after the connection was established.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "store unreachable: {err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
