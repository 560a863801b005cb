//! Session state for the shell.
//!
//! A [`Session`] owns everything a running shell needs between lines: the
//! pending statement, the command registry, and the execution adapter with its
//! trace flags. It handles one input line at a time; reading lines is the
//! [`Repl`](crate::Repl)'s job.

use std::io::Write;

use bqlsh_foundation::{Error, Result};
use bqlsh_language::{Bindings, evaluate};
use bqlsh_storage::Database;
use tracing::debug;

use crate::accumulator::{Accumulator, Append, Language, Statement};
use crate::adapter::Adapter;
use crate::commands;
use crate::output::Output;
use crate::registry::{CommandRegistry, Control, split_command};

/// Farewell printed at end of input.
pub const FAREWELL: &str = "\nMoriturus te querio.\n";

/// Long-lived shell state.
pub struct Session {
    accumulator: Accumulator,
    registry: CommandRegistry,
    adapter: Adapter,
}

impl Session {
    /// Creates a session over `db` with every standard command installed.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the command table cannot be built.
    pub fn new(db: Box<dyn Database>, out: Output) -> Result<Self> {
        let mut registry = CommandRegistry::new();
        commands::install_standard(&mut registry)?;
        Ok(Self::with_registry(db, out, registry))
    }

    /// Creates a session with a caller-built registry.
    #[must_use]
    pub fn with_registry(db: Box<dyn Database>, out: Output, registry: CommandRegistry) -> Self {
        Self {
            accumulator: Accumulator::new(),
            registry,
            adapter: Adapter::new(db, out),
        }
    }

    /// Replaces the accumulator (e.g. to install custom oracles).
    #[must_use]
    pub fn with_accumulator(mut self, accumulator: Accumulator) -> Self {
        self.accumulator = accumulator;
        self
    }

    /// Handles one line of input.
    ///
    /// Sentinel lines are dispatched to their command. Everything else feeds
    /// the accumulator, and a completed statement is executed. The buffer is
    /// already cleared by the time execution starts, so a failure leaves the
    /// session idle.
    ///
    /// # Errors
    ///
    /// Returns lookup, usage, and execution errors for the caller to report.
    pub fn handle_line(&mut self, line: &str) -> Result<Control> {
        if let Some((name, rest)) = split_command(line) {
            let handler = self.registry.resolve(name)?.handler();
            debug!(command = name, "dispatching");
            return handler(self, rest).map_err(|e| e.with_frame(format!(".{name}")));
        }
        match self.accumulator.append(line) {
            Append::Complete(statement) => self.execute(&statement),
            Append::Incomplete | Append::Ignored => Ok(Control::Continue),
        }
    }

    /// Feeds the argument of a language-switching command to the
    /// accumulator, executing it if complete.
    ///
    /// # Errors
    ///
    /// Returns a usage error if a statement in another language is pending,
    /// or the execution error.
    pub fn begin_statement(&mut self, language: Language, text: &str) -> Result<Control> {
        match self.accumulator.begin(language, text)? {
            Append::Complete(statement) => self.execute(&statement),
            Append::Incomplete | Append::Ignored => Ok(Control::Continue),
        }
    }

    /// Executes a complete statement and prints its result.
    ///
    /// # Errors
    ///
    /// Returns the execution error.
    pub fn execute(&mut self, statement: &Statement) -> Result<Control> {
        match statement.language {
            Language::Bql => self.adapter.execute_bql(&statement.text)?,
            Language::Sql => self.adapter.execute_sql(&statement.text)?,
            Language::Expression => self.evaluate(&statement.text)?,
        }
        Ok(Control::Continue)
    }

    /// The names visible to `.python` expressions.
    #[must_use]
    pub fn bindings(&self) -> Bindings {
        let flags = self.adapter.trace_flags();
        Bindings::new()
            .with("bql_traced", i64::from(flags.bql))
            .with("sql_traced", i64::from(flags.sql))
            .with("pending", self.accumulator.pending())
            .with("commands", i64::try_from(self.registry.len()).unwrap_or(i64::MAX))
    }

    fn evaluate(&mut self, text: &str) -> Result<()> {
        let value = evaluate(text.trim(), &self.bindings())?;
        writeln!(self.out(), "{}", value.to_literal())?;
        Ok(())
    }

    /// Handles an interrupt: the pending statement is dropped and the prompt
    /// reset.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn interrupt(&mut self) -> Result<()> {
        self.accumulator.discard();
        writeln!(self.out(), "^C")?;
        Ok(())
    }

    /// Handles end of input: the pending statement is dropped, not run.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn end_of_input(&mut self) -> Result<()> {
        self.accumulator.discard();
        write!(self.out(), "{FAREWELL}")?;
        self.out().flush()?;
        Ok(())
    }

    /// Prints an error: a single line for input and lookup errors, the full
    /// diagnostic for everything else.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn report(&mut self, err: &Error) -> Result<()> {
        if err.is_user_error() {
            writeln!(self.out(), "{err}")?;
        } else {
            write!(self.out(), "{}", err.diagnostic())?;
        }
        Ok(())
    }

    /// The prompt to show before the next read.
    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        self.accumulator.prompt()
    }

    /// Returns true while a statement is pending.
    #[must_use]
    pub const fn is_accumulating(&self) -> bool {
        !self.accumulator.is_idle()
    }

    /// The statement accumulator.
    #[must_use]
    pub const fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// The command registry.
    #[must_use]
    pub const fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The execution adapter.
    #[must_use]
    pub const fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Mutable access to the execution adapter.
    pub fn adapter_mut(&mut self) -> &mut Adapter {
        &mut self.adapter
    }

    /// The output stream.
    pub fn out(&mut self) -> &mut Output {
        self.adapter.out()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("accumulator", &self.accumulator)
            .field("registry", &self.registry.list_names())
            .field("adapter", &self.adapter)
            .finish()
    }
}
