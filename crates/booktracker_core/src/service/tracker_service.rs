//! Booktracker use-case service.
//!
//! # Responsibility
//! - Orchestrate repository calls into one console-facing API.
//! - Resolve free-text titles to canonical books before habit writes.
//!
//! # Invariants
//! - Service APIs never bypass repository constraint mapping.
//! - Service layer remains storage-agnostic.

use crate::model::user::{User, UserId};
use crate::repo::book_repo::{BookId, BookRepository};
use crate::repo::habit_repo::{HabitId, HabitRecord, ReadingHabitRepository};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;

/// Use-case service facade over the three Booktracker repositories.
pub struct TrackerService<U: UserRepository, B: BookRepository, H: ReadingHabitRepository> {
    users: U,
    books: B,
    habits: H,
}

impl<U: UserRepository, B: BookRepository, H: ReadingHabitRepository> TrackerService<U, B, H> {
    /// Creates a service using the provided repository implementations.
    pub fn new(users: U, books: B, habits: H) -> Self {
        Self {
            users,
            books,
            habits,
        }
    }

    /// Registers a user under a caller-chosen id.
    pub fn add_user(&self, user: &User) -> RepoResult<bool> {
        self.users.add_user(user)
    }

    /// Records one reading sitting against the canonical book for `title`.
    ///
    /// # Contract
    /// - The canonical book row is created when `title` is new.
    /// - A canonical row created here is kept even when the habit insert
    ///   fails afterwards.
    pub fn add_reading_habit(
        &self,
        user_id: UserId,
        title: &str,
        pages_read: u32,
    ) -> RepoResult<bool> {
        let book_id = self.books.find_or_create_book(title)?;
        self.habits.add_habit(user_id, book_id, pages_read)
    }

    /// Lists one user's habits, newest first.
    pub fn habits_by_user(&self, user_id: UserId) -> RepoResult<Vec<HabitRecord>> {
        self.habits.habits_by_user(user_id)
    }

    /// Resolves a title to its canonical row id, creating it when absent.
    pub fn find_or_create_book(&self, title: &str) -> RepoResult<BookId> {
        self.books.find_or_create_book(title)
    }

    /// Retitles a canonical book; `false` when the old title is unknown.
    pub fn rename_book(&self, old_title: &str, new_title: &str) -> RepoResult<bool> {
        self.books.rename_book(old_title, new_title)
    }

    /// Deletes one habit row; `false` when the id is unknown.
    pub fn delete_habit(&self, habit_id: HabitId) -> RepoResult<bool> {
        self.habits.delete_habit_by_id(habit_id)
    }

    /// Mean age across registered users; `None` for an empty store.
    pub fn mean_age(&self) -> RepoResult<Option<f64>> {
        self.users.mean_age()
    }

    /// Distinct users that recorded the given title.
    pub fn readers_of_title(&self, title: &str) -> RepoResult<u32> {
        self.habits.count_distinct_readers_of_title(title)
    }

    /// Total pages read across every user and book.
    pub fn total_pages_read(&self) -> RepoResult<i64> {
        self.habits.total_pages_read()
    }

    /// Users whose habits span more than one distinct book.
    pub fn multi_book_readers(&self) -> RepoResult<u32> {
        self.habits.count_users_with_multiple_books()
    }
}
