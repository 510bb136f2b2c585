use booktracker_core::{
    provision_base_tables, ConnectionProvider, MemoryStore, RepoError, SqliteBookRepository,
    SqliteReadingHabitRepository, SqliteUserRepository, TrackerService, User,
};

#[test]
fn add_reading_habit_creates_then_reuses_the_canonical_book() {
    let store = migrated_store();
    let service = service_over(&store);

    service.add_user(&User::named(1, 27, "f", "Mara")).unwrap();
    assert!(service.add_reading_habit(1, "Dune", 50).unwrap());
    assert!(service.add_reading_habit(1, "Dune", 25).unwrap());

    let conn = store.connect().unwrap();
    let books: i64 = conn
        .query_row("SELECT COUNT(*) FROM Books;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(books, 1);
    let (habits, distinct_books): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), COUNT(DISTINCT bookID) FROM ReadingHabit;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(habits, 2);
    assert_eq!(distinct_books, 1);
}

#[test]
fn two_users_recording_one_title_share_the_book_row() {
    let store = migrated_store();
    let service = service_over(&store);

    service.add_user(&User::new(1, 27, "f")).unwrap();
    service.add_user(&User::new(2, 54, "m")).unwrap();
    service.add_reading_habit(1, "Hyperion", 40).unwrap();
    service.add_reading_habit(2, "Hyperion", 60).unwrap();

    let first = service.habits_by_user(1).unwrap();
    let second = service.habits_by_user(2).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(first[0].book_id, second[0].book_id);
}

#[test]
fn failed_habit_insert_keeps_the_canonical_book() {
    let store = migrated_store();
    let service = service_over(&store);

    let err = service.add_reading_habit(42, "Ubik", 12).unwrap_err();
    match err {
        RepoError::MissingReference { user_id, .. } => assert_eq!(user_id, 42),
        other => panic!("unexpected error: {other}"),
    }

    let conn = store.connect().unwrap();
    let books: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM Books WHERE title = 'Ubik';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(books, 1);
    let habits: i64 = conn
        .query_row("SELECT COUNT(*) FROM ReadingHabit;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(habits, 0);
}

#[test]
fn service_wrappers_cover_the_console_surface() {
    let store = migrated_store();
    let service = service_over(&store);

    service.add_user(&User::new(1, 20, "f")).unwrap();
    service.add_user(&User::new(2, 30, "m")).unwrap();
    service.add_reading_habit(1, "Dune", 10).unwrap();
    service.add_reading_habit(1, "Solaris", 20).unwrap();
    service.add_reading_habit(2, "Dune", 30).unwrap();

    assert_eq!(service.mean_age().unwrap(), Some(25.0));
    assert_eq!(service.total_pages_read().unwrap(), 60);
    assert_eq!(service.readers_of_title("Dune").unwrap(), 2);
    assert_eq!(service.multi_book_readers().unwrap(), 1);

    assert!(service.rename_book("Dune", "Dune Messiah").unwrap());
    let listed = service.habits_by_user(1).unwrap();
    assert!(listed.iter().any(|habit| habit.title == "Dune Messiah"));

    let kept = service.find_or_create_book("Dune Messiah").unwrap();
    assert!(listed.iter().any(|habit| habit.book_id == kept));

    assert!(service.delete_habit(listed[0].habit_id).unwrap());
    assert_eq!(service.habits_by_user(1).unwrap().len(), 1);
}

fn migrated_store() -> MemoryStore {
    let store = MemoryStore::new().unwrap();
    let conn = store.connect().unwrap();
    provision_base_tables(&conn).unwrap();
    drop(conn);
    booktracker_core::apply_startup_migrations(&store);
    store
}

fn service_over(
    store: &MemoryStore,
) -> TrackerService<
    SqliteUserRepository<&MemoryStore>,
    SqliteBookRepository<&MemoryStore>,
    SqliteReadingHabitRepository<&MemoryStore>,
> {
    TrackerService::new(
        SqliteUserRepository::new(store),
        SqliteBookRepository::new(store),
        SqliteReadingHabitRepository::new(store),
    )
}
