//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist caller-identified users into the `User` table.
//! - Answer the mean-age aggregate without sentinel values.
//!
//! # Invariants
//! - A duplicate `userID` surfaces as `RepoError::DuplicateUser`, classified
//!   from SQLite result codes at this boundary.
//! - `mean_age` yields `Ok(None)` for an empty table, never an error.

use crate::db::ConnectionProvider;
use crate::model::user::{User, UserId};
use crate::repo::{constraint_kind, ConstraintKind, RepoError, RepoResult};
use rusqlite::params;

/// Repository interface for user registration and age statistics.
pub trait UserRepository {
    fn add_user(&self, user: &User) -> RepoResult<bool>;
    fn mean_age(&self) -> RepoResult<Option<f64>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<P: ConnectionProvider> {
    store: P,
}

impl<P: ConnectionProvider> SqliteUserRepository<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }
}

impl<P: ConnectionProvider> UserRepository for SqliteUserRepository<P> {
    fn add_user(&self, user: &User) -> RepoResult<bool> {
        let conn = self.store.connect()?;
        let inserted = conn
            .execute(
                "INSERT INTO User (userID, age, gender, Name)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    user.user_id,
                    user.age,
                    user.gender.as_str(),
                    user.name.as_deref(),
                ],
            )
            .map_err(|err| map_user_insert_error(err, user.user_id))?;

        Ok(inserted == 1)
    }

    fn mean_age(&self) -> RepoResult<Option<f64>> {
        let conn = self.store.connect()?;
        let mean = conn.query_row("SELECT AVG(age) FROM User;", [], |row| row.get(0))?;
        Ok(mean)
    }
}

fn map_user_insert_error(err: rusqlite::Error, user_id: UserId) -> RepoError {
    match constraint_kind(&err) {
        Some(ConstraintKind::PrimaryKey) | Some(ConstraintKind::Unique) => {
            RepoError::DuplicateUser { user_id }
        }
        Some(_) => RepoError::Constraint(err),
        None => RepoError::from(err),
    }
}
