//! Schema convergence for pre-existing Booktracker stores.
//!
//! # Responsibility
//! - Bring an existing store up to the current schema on every startup.
//! - Provision base tables for brand-new stores.
//!
//! # Invariants
//! - Every routine is idempotent and never rewrites existing rows.
//! - Startup migration failures are logged and swallowed; a genuinely broken
//!   store surfaces on the first real write instead.

use super::{ConnectionProvider, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;

const BASE_TABLES_SQL: &str = "
CREATE TABLE IF NOT EXISTS User (
    userID INTEGER PRIMARY KEY,
    age INTEGER NOT NULL,
    gender TEXT NOT NULL,
    Name TEXT
);

CREATE TABLE IF NOT EXISTS ReadingHabit (
    habitID INTEGER PRIMARY KEY AUTOINCREMENT,
    userID INTEGER NOT NULL REFERENCES User(userID),
    bookID INTEGER NOT NULL REFERENCES Books(bookID),
    pagesRead INTEGER NOT NULL CHECK (pagesRead >= 0),
    submissionMoment TEXT NOT NULL DEFAULT (CURRENT_TIMESTAMP)
);
";

const BOOKS_TABLE_SQL: &str = "
CREATE TABLE Books (
    bookID INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE
);
";

/// What a single schema step did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// The store was changed to match the current schema.
    Applied,
    /// The store already matched; nothing was executed.
    AlreadyCurrent,
    /// The target table is not provisioned yet; nothing to converge.
    SkippedMissingTable,
}

/// Adds the nullable `Name` column to `User` when it is missing.
///
/// A store without a `User` table is reported as skipped, not failed: base
/// tables come from initial provisioning, not from this routine. Existing
/// rows are never touched; the new column starts out NULL everywhere.
pub fn ensure_user_name_column(conn: &Connection) -> DbResult<SchemaOutcome> {
    if !table_exists(conn, "User")? {
        return Ok(SchemaOutcome::SkippedMissingTable);
    }
    if table_has_column(conn, "User", "Name")? {
        return Ok(SchemaOutcome::AlreadyCurrent);
    }

    conn.execute_batch("ALTER TABLE User ADD COLUMN Name TEXT;")?;
    Ok(SchemaOutcome::Applied)
}

/// Creates the `Books` table with its unique-title constraint when absent.
pub fn ensure_books_table(conn: &Connection) -> DbResult<SchemaOutcome> {
    if table_exists(conn, "Books")? {
        return Ok(SchemaOutcome::AlreadyCurrent);
    }

    conn.execute_batch(BOOKS_TABLE_SQL)?;
    Ok(SchemaOutcome::Applied)
}

/// Creates the base `User` and `ReadingHabit` tables for a brand-new store.
///
/// Idempotent; existing tables and their rows are left alone. The `Books`
/// table is owned by [`ensure_books_table`], which runs on every startup.
pub fn provision_base_tables(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(BASE_TABLES_SQL)?;
    Ok(())
}

/// Runs every schema step once, logging outcomes and swallowing failures.
pub fn apply_startup_migrations(store: &impl ConnectionProvider) {
    let conn = match store.connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=schema_migration module=db status=error step=connect error={err}");
            return;
        }
    };

    run_step(&conn, "user_name_column", ensure_user_name_column);
    run_step(&conn, "books_table", ensure_books_table);
}

fn run_step(
    conn: &Connection,
    step: &str,
    ensure: impl Fn(&Connection) -> DbResult<SchemaOutcome>,
) {
    match ensure(conn) {
        Ok(outcome) => info!(
            "event=schema_migration module=db status={} step={step}",
            status_label(outcome)
        ),
        Err(err) => warn!("event=schema_migration module=db status=error step={step} error={err}"),
    }
}

fn status_label(outcome: SchemaOutcome) -> &'static str {
    match outcome {
        SchemaOutcome::Applied => "applied",
        SchemaOutcome::AlreadyCurrent => "already_current",
        SchemaOutcome::SkippedMissingTable => "skipped_missing_table",
    }
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name.eq_ignore_ascii_case(column) {
            return Ok(true);
        }
    }
    Ok(false)
}
