//! Integration tests for the runtime layer
//!
//! Drives whole sessions: scripted input through the read loop against the
//! SQLite backend and the mock database.

mod accumulation;
mod config;
mod shell;

use bqlsh_runtime::{Output, Repl, Session, StdinEditor};
use bqlsh_storage::{Database, SqliteDatabase};

/// Runs `script` through a bannerless shell over `db`, returning everything
/// printed.
pub fn run_script(db: Box<dyn Database>, script: &str) -> String {
    let (out, captured) = Output::capture();
    let session = Session::new(db, out).unwrap();
    let editor = StdinEditor::new(script.as_bytes());
    Repl::with_editor(editor, session)
        .without_banner()
        .run()
        .unwrap();
    captured.contents()
}

/// Runs `script` against a fresh in-memory SQLite database.
pub fn run_sqlite(script: &str) -> String {
    run_script(Box::new(SqliteDatabase::open_in_memory().unwrap()), script)
}

