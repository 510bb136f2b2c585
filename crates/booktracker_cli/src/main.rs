//! Interactive admin console for the Booktracker store.
//!
//! # Responsibility
//! - Wire store, migrations, repositories and service together at startup.
//! - Translate menu choices into `TrackerService` calls and readable output.
//!
//! # Invariants
//! - Store errors are printed, never panicked on; the menu loop continues.
//! - End of input behaves like choosing exit.

use booktracker_core::{
    apply_startup_migrations, default_log_level, init_logging, provision_base_tables,
    ConnectionProvider, DbResult, FileStore, HabitRecord, RepoError, SqliteBookRepository,
    SqliteReadingHabitRepository, SqliteUserRepository, TrackerService, User,
};
use log::{error, info};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_DB_FILE: &str = "Booktracker.db";

type InputLines = io::Lines<io::StdinLock<'static>>;

type Service<'a> = TrackerService<
    SqliteUserRepository<&'a FileStore>,
    SqliteBookRepository<&'a FileStore>,
    SqliteReadingHabitRepository<&'a FileStore>,
>;

fn main() {
    let db_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

    init_console_logging();

    let store = FileStore::new(&db_path);
    if let Err(err) = prepare_store(&store) {
        eprintln!("cannot open store at {}: {err}", db_path.display());
        error!(
            "event=app_start module=cli status=error path={} error={err}",
            db_path.display()
        );
        std::process::exit(1);
    }

    info!(
        "event=app_start module=cli status=ok version={} path={}",
        env!("CARGO_PKG_VERSION"),
        db_path.display()
    );

    let service = TrackerService::new(
        SqliteUserRepository::new(&store),
        SqliteBookRepository::new(&store),
        SqliteReadingHabitRepository::new(&store),
    );

    run_menu_loop(&service);

    info!("event=app_exit module=cli status=ok");
    println!("Bye.");
}

/// Provisions a brand-new store, then converges the schema.
///
/// Provisioning runs only when the database file does not exist yet; an
/// existing store is never re-provisioned, only migrated.
fn prepare_store(store: &FileStore) -> DbResult<()> {
    if !store.path().exists() {
        let conn = store.connect()?;
        provision_base_tables(&conn)?;
        info!(
            "event=store_provisioned module=cli status=ok path={}",
            store.path().display()
        );
    }
    apply_startup_migrations(store);
    Ok(())
}

fn init_console_logging() {
    let log_dir = std::env::current_dir()
        .ok()
        .map(|dir| dir.join("logs"))
        .and_then(|dir| dir.to_str().map(str::to_string));
    match log_dir {
        Some(dir) => {
            if let Err(err) = init_logging(default_log_level(), &dir) {
                eprintln!("logging disabled: {err}");
            }
        }
        None => eprintln!("logging disabled: cannot resolve a log directory"),
    }
}

fn run_menu_loop(service: &Service<'_>) {
    let mut lines = io::stdin().lines();

    loop {
        print_menu();
        let choice = match prompt_line(&mut lines, "Choose an action: ") {
            Some(choice) => choice,
            None => break,
        };

        let completed = match choice.as_str() {
            "1" => add_user_action(service, &mut lines),
            "2" => add_habit_action(service, &mut lines),
            "3" => show_habits_action(service, &mut lines),
            "4" => rename_book_action(service, &mut lines),
            "5" => delete_habit_action(service, &mut lines),
            "6" => mean_age_action(service),
            "7" => readers_action(service, &mut lines),
            "8" => total_pages_action(service),
            "9" => multi_book_action(service),
            "0" => break,
            other => {
                println!("Unknown choice `{other}`.");
                Some(())
            }
        };
        if completed.is_none() {
            println!("Action aborted.");
        }
    }
}

fn print_menu() {
    println!();
    println!("1 Add user                      6 Show mean user age");
    println!("2 Add reading habit             7 Show reader count for a book");
    println!("3 Show reading habits for user  8 Show total pages read");
    println!("4 Change a book title           9 Show users reading more than one book");
    println!("5 Delete a reading habit        0 Exit");
}

/// Actions return `None` when a prompt was aborted; the loop reports it and
/// shows the menu again.
fn add_user_action(service: &Service<'_>, lines: &mut InputLines) -> Option<()> {
    let user_id: i64 = prompt_number(lines, "User id: ")?;
    let age: u32 = prompt_number(lines, "Age: ")?;
    let gender = prompt_line(lines, "Gender: ")?;
    let name = prompt_line(lines, "Name (blank for none): ")?;

    let user = if name.is_empty() {
        User::new(user_id, age, gender)
    } else {
        User::named(user_id, age, gender, name)
    };
    match service.add_user(&user) {
        Ok(true) => println!("User {user_id} added."),
        Ok(false) => println!("User {user_id} was not added."),
        Err(err) => report_error("add_user", &err),
    }
    Some(())
}

fn add_habit_action(service: &Service<'_>, lines: &mut InputLines) -> Option<()> {
    let user_id: i64 = prompt_number(lines, "User id: ")?;
    let title = prompt_title(lines, "Book title: ")?;
    let pages_read: u32 = prompt_number(lines, "Pages read: ")?;

    match service.add_reading_habit(user_id, &title, pages_read) {
        Ok(true) => println!("Habit recorded for user {user_id}."),
        Ok(false) => println!("Habit was not recorded."),
        Err(err) => report_error("add_reading_habit", &err),
    }
    Some(())
}

fn show_habits_action(service: &Service<'_>, lines: &mut InputLines) -> Option<()> {
    let user_id: i64 = prompt_number(lines, "User id: ")?;

    match service.habits_by_user(user_id) {
        Ok(habits) if habits.is_empty() => println!("No habits recorded for user {user_id}."),
        Ok(habits) => print_habit_table(&habits),
        Err(err) => report_error("habits_by_user", &err),
    }
    Some(())
}

fn rename_book_action(service: &Service<'_>, lines: &mut InputLines) -> Option<()> {
    let old_title = prompt_title(lines, "Current title: ")?;
    let new_title = prompt_title(lines, "New title: ")?;

    match service.rename_book(&old_title, &new_title) {
        Ok(true) => println!("Retitled `{old_title}` to `{new_title}`."),
        Ok(false) => println!("No book titled `{old_title}`."),
        Err(err) => report_error("rename_book", &err),
    }
    Some(())
}

fn delete_habit_action(service: &Service<'_>, lines: &mut InputLines) -> Option<()> {
    let habit_id: i64 = prompt_number(lines, "Habit id: ")?;

    match service.delete_habit(habit_id) {
        Ok(true) => println!("Habit {habit_id} deleted."),
        Ok(false) => println!("No habit with id {habit_id}."),
        Err(err) => report_error("delete_habit", &err),
    }
    Some(())
}

fn mean_age_action(service: &Service<'_>) -> Option<()> {
    match service.mean_age() {
        Ok(Some(mean)) => println!("Mean user age: {mean:.2}"),
        Ok(None) => println!("No users registered yet."),
        Err(err) => report_error("mean_age", &err),
    }
    Some(())
}

fn readers_action(service: &Service<'_>, lines: &mut InputLines) -> Option<()> {
    let title = prompt_title(lines, "Book title: ")?;

    match service.readers_of_title(&title) {
        Ok(count) => println!("{count} user(s) have read `{title}`."),
        Err(err) => report_error("readers_of_title", &err),
    }
    Some(())
}

fn total_pages_action(service: &Service<'_>) -> Option<()> {
    match service.total_pages_read() {
        Ok(total) => println!("Total pages read: {total}"),
        Err(err) => report_error("total_pages_read", &err),
    }
    Some(())
}

fn multi_book_action(service: &Service<'_>) -> Option<()> {
    match service.multi_book_readers() {
        Ok(count) => println!("{count} user(s) are reading more than one book."),
        Err(err) => report_error("multi_book_readers", &err),
    }
    Some(())
}

fn print_habit_table(habits: &[HabitRecord]) {
    println!(
        "{:<10} {:<30} {:<10} {:<20}",
        "habit", "title", "pages", "submitted"
    );
    for habit in habits {
        println!(
            "{:<10} {:<30} {:<10} {:<20}",
            habit.habit_id, habit.title, habit.pages_read, habit.submission_moment
        );
    }
}

fn report_error(action: &str, err: &RepoError) {
    match err {
        RepoError::DuplicateUser { user_id } => {
            println!("A user with id {user_id} already exists.");
        }
        RepoError::DuplicateTitle { title } => {
            println!("A book titled `{title}` already exists.");
        }
        RepoError::MissingReference { user_id, book_id } => {
            println!("No such user ({user_id}) or book ({book_id}).");
        }
        other => println!("The store rejected the request: {other}"),
    }
    error!("event=console_action module=cli status=error action={action} error={err}");
}

fn prompt_line(lines: &mut InputLines, prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    match lines.next() {
        Some(Ok(line)) => Some(line.trim().to_string()),
        Some(Err(err)) => {
            eprintln!("cannot read input: {err}");
            None
        }
        None => None,
    }
}

fn prompt_title(lines: &mut InputLines, label: &str) -> Option<String> {
    let title = prompt_line(lines, label)?;
    if title.is_empty() {
        println!("A title cannot be empty.");
        return None;
    }
    Some(title)
}

fn prompt_number<T: FromStr>(lines: &mut InputLines, label: &str) -> Option<T> {
    let raw = prompt_line(lines, label)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            println!("`{raw}` is not a valid number.");
            None
        }
    }
}
