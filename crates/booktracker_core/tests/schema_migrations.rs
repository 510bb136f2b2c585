use booktracker_core::{
    apply_startup_migrations, ensure_books_table, ensure_user_name_column, provision_base_tables,
    ConnectionProvider, FileStore, MemoryStore, SchemaOutcome,
};
use rusqlite::Connection;

const LEGACY_TABLES_SQL: &str = "
CREATE TABLE User (
    userID INTEGER PRIMARY KEY,
    age INTEGER NOT NULL,
    gender TEXT NOT NULL
);

CREATE TABLE ReadingHabit (
    habitID INTEGER PRIMARY KEY AUTOINCREMENT,
    userID INTEGER NOT NULL REFERENCES User(userID),
    bookID INTEGER NOT NULL REFERENCES Books(bookID),
    pagesRead INTEGER NOT NULL CHECK (pagesRead >= 0),
    submissionMoment TEXT NOT NULL DEFAULT (CURRENT_TIMESTAMP)
);
";

#[test]
fn ensure_user_name_column_adds_column_and_preserves_rows() {
    let store = MemoryStore::new().unwrap();
    let conn = store.connect().unwrap();
    conn.execute_batch(LEGACY_TABLES_SQL).unwrap();
    conn.execute(
        "INSERT INTO User (userID, age, gender) VALUES (1, 28, 'f');",
        [],
    )
    .unwrap();

    let first = ensure_user_name_column(&conn).unwrap();
    assert_eq!(first, SchemaOutcome::Applied);
    assert_column_exists(&conn, "User", "Name");

    let (age, gender, name): (i64, String, Option<String>) = conn
        .query_row(
            "SELECT age, gender, Name FROM User WHERE userID = 1;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(age, 28);
    assert_eq!(gender, "f");
    assert_eq!(name, None);

    let second = ensure_user_name_column(&conn).unwrap();
    assert_eq!(second, SchemaOutcome::AlreadyCurrent);
}

#[test]
fn ensure_user_name_column_without_user_table_reports_skip() {
    let store = MemoryStore::new().unwrap();
    let conn = store.connect().unwrap();

    let outcome = ensure_user_name_column(&conn).unwrap();
    assert_eq!(outcome, SchemaOutcome::SkippedMissingTable);
    assert_table_missing(&conn, "User");
}

#[test]
fn ensure_books_table_creates_once_with_unique_titles() {
    let store = MemoryStore::new().unwrap();
    let conn = store.connect().unwrap();

    assert_eq!(ensure_books_table(&conn).unwrap(), SchemaOutcome::Applied);
    assert_eq!(
        ensure_books_table(&conn).unwrap(),
        SchemaOutcome::AlreadyCurrent
    );

    conn.execute("INSERT INTO Books (title) VALUES ('Dune');", [])
        .unwrap();
    conn.execute("INSERT INTO Books (title) VALUES ('Dune');", [])
        .unwrap_err();
}

#[test]
fn startup_migrations_converge_a_legacy_store() {
    let store = MemoryStore::new().unwrap();
    let conn = store.connect().unwrap();
    conn.execute_batch(LEGACY_TABLES_SQL).unwrap();
    conn.execute(
        "INSERT INTO User (userID, age, gender) VALUES (1, 28, 'f'), (2, 61, 'm');",
        [],
    )
    .unwrap();
    drop(conn);

    apply_startup_migrations(&store);
    apply_startup_migrations(&store);

    let conn = store.connect().unwrap();
    assert_table_exists(&conn, "Books");
    assert_column_exists(&conn, "User", "Name");
    let users: i64 = conn
        .query_row("SELECT COUNT(*) FROM User;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(users, 2);
}

#[test]
fn startup_migrations_against_unreachable_store_return_quietly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("store.db");
    let store = FileStore::new(&path);

    apply_startup_migrations(&store);

    assert!(!path.exists());
}

#[test]
fn provision_base_tables_is_idempotent_and_preserves_rows() {
    let store = MemoryStore::new().unwrap();
    let conn = store.connect().unwrap();

    provision_base_tables(&conn).unwrap();
    conn.execute(
        "INSERT INTO User (userID, age, gender, Name) VALUES (9, 45, 'm', 'Sam');",
        [],
    )
    .unwrap();

    provision_base_tables(&conn).unwrap();

    let (users, name): (i64, String) = conn
        .query_row(
            "SELECT COUNT(*), MAX(Name) FROM User;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(users, 1);
    assert_eq!(name, "Sam");
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert!(
        table_exists(conn, table_name),
        "table {table_name} does not exist"
    );
}

fn assert_table_missing(conn: &Connection, table_name: &str) {
    assert!(
        !table_exists(conn, table_name),
        "table {table_name} should not exist"
    );
}

fn table_exists(conn: &Connection, table_name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}

fn assert_column_exists(conn: &Connection, table: &str, column: &str) {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});")).unwrap();
    let mut rows = stmt.query([]).unwrap();
    while let Some(row) = rows.next().unwrap() {
        let name: String = row.get(1).unwrap();
        if name.eq_ignore_ascii_case(column) {
            return;
        }
    }
    panic!("column {column} does not exist on {table}");
}
