//! The engine boundary the shell talks to.
//!
//! Everything the shell needs from a query engine goes through [`Database`]:
//! statement execution, savepoints, trace subscriptions, catalog lookups, and
//! the file loaders. Backends implement the trait; the shell only ever holds a
//! `Box<dyn Database>`.

use std::path::Path;
use std::rc::Rc;

use bqlsh_foundation::{Cursor, Result, Value};
use tracing::warn;

/// Observer invoked with a statement's text and bound parameters just before
/// it runs.
pub type TraceHook = Rc<dyn Fn(&str, &[Value])>;

/// Which execution path a trace hook observes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceKind {
    /// Statements submitted through [`Database::execute`].
    Bql,
    /// Statements run against the storage layer, including those issued
    /// internally by the engine.
    Sql,
}

impl TraceKind {
    /// The name used on the command line (`bql` or `sql`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bql => "bql",
            Self::Sql => "sql",
        }
    }

    /// Parses a command-line trace name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bql" => Some(Self::Bql),
            "sql" => Some(Self::Sql),
            _ => None,
        }
    }
}

/// A query engine reachable from the shell.
pub trait Database {
    // ===== Execution =====

    /// Executes a BQL statement with positional parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement is rejected or fails.
    fn execute(&mut self, bql: &str, params: &[Value]) -> Result<Cursor>;

    /// Executes a raw SQL statement against the storage layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement is rejected or fails.
    fn sql_execute(&mut self, sql: &str, params: &[Value]) -> Result<Cursor>;

    /// Opens a (possibly nested) savepoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the savepoint cannot be created.
    fn savepoint_begin(&mut self) -> Result<()>;

    /// Commits the innermost savepoint.
    ///
    /// # Errors
    ///
    /// Returns an error if no savepoint is open or the release fails.
    fn savepoint_release(&mut self) -> Result<()>;

    /// Rolls back and closes the innermost savepoint.
    ///
    /// # Errors
    ///
    /// Returns an error if no savepoint is open or the rollback fails.
    fn savepoint_rollback(&mut self) -> Result<()>;

    // ===== Tracing =====

    /// Subscribes `hook` to statements of the given kind.
    fn trace(&mut self, kind: TraceKind, hook: TraceHook);

    /// Removes a previously subscribed hook. Unknown hooks are ignored.
    fn untrace(&mut self, kind: TraceKind, hook: &TraceHook);

    // ===== Catalog =====

    /// Returns true if a table called `name` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be queried.
    fn has_table(&mut self, name: &str) -> Result<bool>;

    /// Ensures `bayesdb_column` has an entry for every column of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table's schema cannot be read or recorded.
    fn table_guarantee_columns(&mut self, table: &str) -> Result<()>;

    /// Returns true if a generator called `name` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be queried.
    fn has_generator(&mut self, name: &str) -> Result<bool>;

    /// Looks up a generator's id, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be queried.
    fn generator_id(&mut self, name: &str) -> Result<Option<i64>>;

    /// Returns true if the generator has a model numbered `modelno`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be queried.
    fn generator_has_model(&mut self, generator_id: i64, modelno: i64) -> Result<bool>;

    // ===== Loaders =====

    /// Creates `table` from a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or the
    /// table already exists.
    fn read_csv(&mut self, table: &str, path: &Path) -> Result<()>;

    /// Attaches short names, descriptions and value maps from a codebook file
    /// to the columns of `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or names an unknown column.
    fn load_codebook(&mut self, table: &str, path: &Path) -> Result<()>;

    /// Materialises `generator` over `table` from a legacy model archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be loaded.
    fn load_legacy_models(&mut self, generator: &str, table: &str, path: &Path) -> Result<()>;
}

/// Runs `f` inside a savepoint.
///
/// The savepoint is released when `f` succeeds and rolled back when it
/// returns an error, so every exit path closes it.
///
/// # Errors
///
/// Returns the error from `f`, or from opening or releasing the savepoint.
pub fn with_savepoint<D, T, F>(db: &mut D, f: F) -> Result<T>
where
    D: Database + ?Sized,
    F: FnOnce(&mut D) -> Result<T>,
{
    db.savepoint_begin()?;
    match f(db) {
        Ok(value) => {
            db.savepoint_release()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = db.savepoint_rollback() {
                warn!("savepoint rollback failed: {rollback}");
            }
            Err(err)
        }
    }
}

/// Quotes an identifier for interpolation into SQL text.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
