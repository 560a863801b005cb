//! Execution adapter: the shell's only path into the database.
//!
//! Runs complete statements, prints their results, and owns the trace
//! subscriptions. The [`TraceFlags`] are the single source of truth for
//! whether a hook is subscribed, so toggling is idempotent.

use std::io::Write;
use std::rc::Rc;

use bqlsh_foundation::{Cursor, Result, Value, render_params};
use bqlsh_language::{pp_cursor, split_statements};
use bqlsh_storage::{Database, TraceHook, TraceKind, with_savepoint};
use tracing::{debug, warn};

use crate::output::Output;

/// Which traces are currently on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceFlags {
    /// Statement-level (BQL) tracing.
    pub bql: bool,
    /// Storage-level (SQL) tracing.
    pub sql: bool,
}

impl TraceFlags {
    /// Returns the flag for `kind`.
    #[must_use]
    pub const fn get(self, kind: TraceKind) -> bool {
        match kind {
            TraceKind::Bql => self.bql,
            TraceKind::Sql => self.sql,
        }
    }

    fn set(&mut self, kind: TraceKind, on: bool) {
        match kind {
            TraceKind::Bql => self.bql = on,
            TraceKind::Sql => self.sql = on,
        }
    }
}

/// Wraps a [`Database`] with result printing and trace management.
pub struct Adapter {
    db: Box<dyn Database>,
    out: Output,
    flags: TraceFlags,
    bql_hook: TraceHook,
    sql_hook: TraceHook,
}

impl Adapter {
    /// Creates an adapter printing to `out`.
    #[must_use]
    pub fn new(db: Box<dyn Database>, out: Output) -> Self {
        let bql_hook = trace_hook(out.clone(), "-->");
        let sql_hook = trace_hook(out.clone(), "==>");
        Self {
            db,
            out,
            flags: TraceFlags::default(),
            bql_hook,
            sql_hook,
        }
    }

    /// Executes BQL text, printing each statement's result.
    ///
    /// Each result is printed inside a savepoint. Execution stops at the
    /// first failing statement.
    ///
    /// # Errors
    ///
    /// Returns the first execution or output error.
    pub fn execute_bql(&mut self, text: &str) -> Result<()> {
        for statement in split_statements(text) {
            debug!(statement, "bql");
            let cursor = self.db.execute(statement, &[])?;
            self.in_savepoint(|_, out| Ok(pp_cursor(out, &cursor)?))?;
        }
        Ok(())
    }

    /// Runs `f` inside a savepoint, with access to the database and the
    /// output stream.
    ///
    /// # Errors
    ///
    /// Returns the error from `f` (after rolling back) or from the savepoint
    /// itself.
    pub fn in_savepoint<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Database, &mut Output) -> Result<T>,
    {
        let out = &mut self.out;
        with_savepoint(self.db.as_mut(), |db| f(db, out))
    }

    /// Executes raw SQL text against the storage layer, printing each
    /// statement's result.
    ///
    /// # Errors
    ///
    /// Returns the first execution or output error.
    pub fn execute_sql(&mut self, text: &str) -> Result<()> {
        for statement in split_statements(text) {
            debug!(statement, "sql");
            let cursor = self.db.sql_execute(statement, &[])?;
            pp_cursor(&mut self.out, &cursor)?;
        }
        Ok(())
    }

    /// Runs BQL with parameters and returns the cursor unprinted.
    ///
    /// # Errors
    ///
    /// Returns an error if execution fails.
    pub fn query(&mut self, bql: &str, params: &[Value]) -> Result<Cursor> {
        self.db.execute(bql, params)
    }

    /// Runs SQL with parameters and returns the cursor unprinted.
    ///
    /// # Errors
    ///
    /// Returns an error if execution fails.
    pub fn sql_query(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        self.db.sql_execute(sql, params)
    }

    /// Prints a cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn print_cursor(&mut self, cursor: &Cursor) -> Result<()> {
        Ok(pp_cursor(&mut self.out, cursor)?)
    }

    /// Turns a trace on or off. Returns true if the state changed.
    ///
    /// Subscribes or unsubscribes the hook exactly once per change.
    pub fn set_trace(&mut self, kind: TraceKind, on: bool) -> bool {
        if self.flags.get(kind) == on {
            return false;
        }
        let hook = match kind {
            TraceKind::Bql => Rc::clone(&self.bql_hook),
            TraceKind::Sql => Rc::clone(&self.sql_hook),
        };
        if on {
            self.db.trace(kind, hook);
        } else {
            self.db.untrace(kind, &hook);
        }
        self.flags.set(kind, on);
        debug!(kind = kind.name(), on, "trace toggled");
        true
    }

    /// Current trace state.
    #[must_use]
    pub const fn trace_flags(&self) -> TraceFlags {
        self.flags
    }

    /// The underlying database.
    pub fn database(&mut self) -> &mut dyn Database {
        self.db.as_mut()
    }

    /// The output stream.
    pub fn out(&mut self) -> &mut Output {
        &mut self.out
    }
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

fn trace_hook(out: Output, marker: &'static str) -> TraceHook {
    Rc::new(move |text: &str, params: &[Value]| {
        let mut out = out.clone();
        if let Err(err) = writeln!(out, "{marker} {} {}", text.trim(), render_params(params)) {
            warn!("trace output failed: {err}");
        }
    })
}
