//! Reading-habit repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist per-sitting reading records into the `ReadingHabit` table.
//! - Answer the console's aggregate queries in SQL, not in Rust loops.
//!
//! # Invariants
//! - Habit listings resolve titles through the `Books` join, so renames are
//!   visible in historical rows.
//! - A write referencing an unknown user or book surfaces as
//!   `RepoError::MissingReference`, classified from SQLite result codes.

use crate::db::ConnectionProvider;
use crate::model::user::UserId;
use crate::repo::book_repo::BookId;
use crate::repo::{constraint_kind, ConstraintKind, RepoError, RepoResult};
use rusqlite::params;

/// Store-assigned identifier for one recorded reading sitting.
pub type HabitId = i64;

/// Read model for the per-user habit listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitRecord {
    /// Store-assigned habit id.
    pub habit_id: HabitId,
    /// Owning user.
    pub user_id: UserId,
    /// Canonical book row the habit points at.
    pub book_id: BookId,
    /// Pages read in this sitting.
    pub pages_read: u32,
    /// Store-generated UTC timestamp text (`YYYY-MM-DD HH:MM:SS`).
    pub submission_moment: String,
    /// Current canonical title, resolved through the `Books` join.
    pub title: String,
}

/// Repository interface for reading-habit records and aggregates.
pub trait ReadingHabitRepository {
    /// Records one reading sitting; the store assigns id and timestamp.
    fn add_habit(&self, user_id: UserId, book_id: BookId, pages_read: u32) -> RepoResult<bool>;
    /// Deletes one habit row; `false` when the id is unknown.
    fn delete_habit_by_id(&self, habit_id: HabitId) -> RepoResult<bool>;
    /// Lists one user's habits, newest first, with canonical titles.
    fn habits_by_user(&self, user_id: UserId) -> RepoResult<Vec<HabitRecord>>;
    /// Sums pages read across all users; 0 for an empty store.
    fn total_pages_read(&self) -> RepoResult<i64>;
    /// Counts distinct users that recorded the given title.
    fn count_distinct_readers_of_title(&self, title: &str) -> RepoResult<u32>;
    /// Counts users with habits spanning more than one distinct book.
    fn count_users_with_multiple_books(&self) -> RepoResult<u32>;
}

/// SQLite-backed reading-habit repository.
pub struct SqliteReadingHabitRepository<P: ConnectionProvider> {
    store: P,
}

impl<P: ConnectionProvider> SqliteReadingHabitRepository<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }
}

impl<P: ConnectionProvider> ReadingHabitRepository for SqliteReadingHabitRepository<P> {
    fn add_habit(&self, user_id: UserId, book_id: BookId, pages_read: u32) -> RepoResult<bool> {
        let conn = self.store.connect()?;
        let inserted = conn
            .execute(
                "INSERT INTO ReadingHabit (userID, bookID, pagesRead)
                 VALUES (?1, ?2, ?3);",
                params![user_id, book_id, pages_read],
            )
            .map_err(|err| map_habit_insert_error(err, user_id, book_id))?;

        Ok(inserted == 1)
    }

    fn delete_habit_by_id(&self, habit_id: HabitId) -> RepoResult<bool> {
        let conn = self.store.connect()?;
        let deleted = conn.execute("DELETE FROM ReadingHabit WHERE habitID = ?1;", [habit_id])?;
        Ok(deleted == 1)
    }

    fn habits_by_user(&self, user_id: UserId) -> RepoResult<Vec<HabitRecord>> {
        let conn = self.store.connect()?;
        let mut stmt = conn.prepare(
            "SELECT
                rh.habitID,
                rh.userID,
                rh.bookID,
                rh.pagesRead,
                rh.submissionMoment,
                b.title
             FROM ReadingHabit rh
             INNER JOIN Books b ON b.bookID = rh.bookID
             WHERE rh.userID = ?1
             ORDER BY rh.submissionMoment DESC, rh.habitID DESC;",
        )?;

        let mut rows = stmt.query([user_id])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(HabitRecord {
                habit_id: row.get("habitID")?,
                user_id: row.get("userID")?,
                book_id: row.get("bookID")?,
                pages_read: row.get("pagesRead")?,
                submission_moment: row.get("submissionMoment")?,
                title: row.get("title")?,
            });
        }

        Ok(habits)
    }

    fn total_pages_read(&self) -> RepoResult<i64> {
        let conn = self.store.connect()?;
        let total: Option<i64> =
            conn.query_row("SELECT SUM(pagesRead) FROM ReadingHabit;", [], |row| {
                row.get(0)
            })?;
        Ok(total.unwrap_or(0))
    }

    fn count_distinct_readers_of_title(&self, title: &str) -> RepoResult<u32> {
        let conn = self.store.connect()?;
        let readers = conn.query_row(
            "SELECT COUNT(DISTINCT rh.userID)
             FROM ReadingHabit rh
             INNER JOIN Books b ON b.bookID = rh.bookID
             WHERE b.title = ?1;",
            [title],
            |row| row.get(0),
        )?;
        Ok(readers)
    }

    fn count_users_with_multiple_books(&self) -> RepoResult<u32> {
        let conn = self.store.connect()?;
        let users = conn.query_row(
            "SELECT COUNT(*)
             FROM (
                SELECT userID
                FROM ReadingHabit
                GROUP BY userID
                HAVING COUNT(DISTINCT bookID) > 1
             );",
            [],
            |row| row.get(0),
        )?;
        Ok(users)
    }
}

fn map_habit_insert_error(err: rusqlite::Error, user_id: UserId, book_id: BookId) -> RepoError {
    match constraint_kind(&err) {
        Some(ConstraintKind::ForeignKey) => RepoError::MissingReference { user_id, book_id },
        Some(_) => RepoError::Constraint(err),
        None => RepoError::from(err),
    }
}
