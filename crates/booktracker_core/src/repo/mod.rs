//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for users, books and
//!   reading habits.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`DuplicateUser`,
//!   `MissingReference`) in addition to DB transport errors.
//! - Constraint classification relies on SQLite result codes, never on
//!   error message text.

pub mod book_repo;
pub mod habit_repo;
pub mod user_repo;

use crate::db::DbError;
use crate::model::user::UserId;
use crate::repo::book_repo::BookId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The given `user_id` is already registered.
    DuplicateUser { user_id: UserId },
    /// The target title is already held by another book row.
    DuplicateTitle { title: String },
    /// A habit write referenced a user or book the store does not know.
    MissingReference { user_id: UserId, book_id: BookId },
    /// No canonical book row could be produced for the title.
    FindOrCreateFailed { title: String },
    /// Constraint violation outside the mapped domain cases.
    Constraint(rusqlite::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateUser { user_id } => write!(f, "user already registered: {user_id}"),
            Self::DuplicateTitle { title } => write!(f, "book title already taken: `{title}`"),
            Self::MissingReference { user_id, book_id } => write!(
                f,
                "habit references unknown user {user_id} or book {book_id}"
            ),
            Self::FindOrCreateFailed { title } => {
                write!(f, "no canonical book row for title `{title}`")
            }
            Self::Constraint(err) => write!(f, "constraint violation: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateUser { .. } => None,
            Self::DuplicateTitle { .. } => None,
            Self::MissingReference { .. } => None,
            Self::FindOrCreateFailed { .. } => None,
            Self::Constraint(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Classified cause of a SQLite constraint failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey,
    Other,
}

/// Classifies a constraint violation by its extended result code.
///
/// Returns `None` for anything that is not a constraint failure, so callers
/// can fall through to plain transport-error handling.
pub(crate) fn constraint_kind(err: &rusqlite::Error) -> Option<ConstraintKind> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::PrimaryKey,
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => ConstraintKind::Unique,
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                _ => ConstraintKind::Other,
            })
        }
        _ => None,
    }
}
