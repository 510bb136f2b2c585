//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Maintain the canonical `Books` catalog keyed by globally unique titles.
//! - Resolve titles to stable row ids for habit records.
//!
//! # Invariants
//! - `find_or_create_book` runs lookup and insert inside one immediate
//!   transaction; the unique title constraint is the backstop for racing
//!   creators.
//! - Renames rewrite the canonical row only; habit rows are never touched.

use crate::db::ConnectionProvider;
use crate::repo::{constraint_kind, ConstraintKind, RepoError, RepoResult};
use rusqlite::{params, Connection, TransactionBehavior};

/// Store-assigned identifier for a canonical book row.
pub type BookId = i64;

/// Repository interface for the canonical book catalog.
pub trait BookRepository {
    /// Returns the canonical row id for `title`, creating the row when absent.
    fn find_or_create_book(&self, title: &str) -> RepoResult<BookId>;
    /// Retitles one canonical row; `false` when no row carries `old_title`.
    fn rename_book(&self, old_title: &str, new_title: &str) -> RepoResult<bool>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<P: ConnectionProvider> {
    store: P,
}

impl<P: ConnectionProvider> SqliteBookRepository<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }
}

impl<P: ConnectionProvider> BookRepository for SqliteBookRepository<P> {
    fn find_or_create_book(&self, title: &str) -> RepoResult<BookId> {
        let mut conn = self.store.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(book_id) = book_id_by_title(&tx, title)? {
            tx.commit()?;
            return Ok(book_id);
        }

        match tx.execute("INSERT INTO Books (title) VALUES (?1);", [title]) {
            Ok(_) => {
                let book_id = tx.last_insert_rowid();
                tx.commit()?;
                return Ok(book_id);
            }
            // A concurrent creator won the insert; adopt its row below.
            Err(err) if constraint_kind(&err) == Some(ConstraintKind::Unique) => {}
            Err(err) => return Err(RepoError::from(err)),
        }

        match book_id_by_title(&tx, title)? {
            Some(book_id) => {
                tx.commit()?;
                Ok(book_id)
            }
            None => Err(RepoError::FindOrCreateFailed {
                title: title.to_string(),
            }),
        }
    }

    fn rename_book(&self, old_title: &str, new_title: &str) -> RepoResult<bool> {
        let conn = self.store.connect()?;
        let changed = conn
            .execute(
                "UPDATE Books SET title = ?1 WHERE title = ?2;",
                params![new_title, old_title],
            )
            .map_err(|err| map_rename_error(err, new_title))?;

        Ok(changed == 1)
    }
}

fn map_rename_error(err: rusqlite::Error, new_title: &str) -> RepoError {
    match constraint_kind(&err) {
        Some(ConstraintKind::Unique) => RepoError::DuplicateTitle {
            title: new_title.to_string(),
        },
        Some(_) => RepoError::Constraint(err),
        None => RepoError::from(err),
    }
}

fn book_id_by_title(conn: &Connection, title: &str) -> RepoResult<Option<BookId>> {
    let mut stmt = conn.prepare("SELECT bookID FROM Books WHERE title = ?1;")?;
    let mut rows = stmt.query([title])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(row.get(0)?));
    }
    Ok(None)
}
