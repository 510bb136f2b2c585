//! Core persistence and schema-evolution logic for Booktracker.
//! This crate is the single source of truth for store invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{
    apply_startup_migrations, ensure_books_table, ensure_user_name_column, provision_base_tables,
    ConnectionProvider, DbError, DbResult, FileStore, MemoryStore, SchemaOutcome,
};
pub use logging::{default_log_level, init_logging};
pub use model::user::{User, UserId};
pub use repo::book_repo::{BookId, BookRepository, SqliteBookRepository};
pub use repo::habit_repo::{
    HabitId, HabitRecord, ReadingHabitRepository, SqliteReadingHabitRepository,
};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::tracker_service::TrackerService;
