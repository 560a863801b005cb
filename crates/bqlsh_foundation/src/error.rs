//! Error types for the bqlsh system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// The main error type for bqlsh operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
    /// The lower-level error this one was raised from, if any.
    #[source]
    cause: Option<BoxedCause>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            cause: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a frame onto this error's context, creating the context if needed.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Records the lower-level error that caused this one.
    #[must_use]
    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }

    /// Creates a usage error carrying the one-line message shown to the user.
    #[must_use]
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage(message.into()))
    }

    /// Creates an unknown meta-command error.
    #[must_use]
    pub fn no_such_command(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoSuchCommand(name.into()))
    }

    /// Creates a lookup error for one or more missing entities.
    #[must_use]
    pub fn not_found(entity: EntityKind, names: Vec<String>) -> Self {
        Self::new(ErrorKind::NotFound { entity, names })
    }

    /// Creates a query execution error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Query(message.into()))
    }

    /// Creates an unsupported-operation error.
    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported(message.into()))
    }

    /// Creates an error for a data file that could not be ingested.
    #[must_use]
    pub fn load(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Load(message.into()))
    }

    /// Creates an expression evaluation error.
    #[must_use]
    pub fn eval(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Eval(message.into()))
    }

    /// Returns true if this error describes bad user input or a failed lookup
    /// rather than a failure inside the engine.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        self.kind.is_user_error()
    }

    /// Renders the full diagnostic: the error itself, its context frames, and
    /// the chain of underlying causes.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let mut out = format!("Error: {}\n", self.kind);
        if let Some(context) = &self.context {
            let rendered = context.to_string();
            if !rendered.is_empty() {
                out.push_str(&rendered);
                if !rendered.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
        // drivers often wrap an error around a source with the same message
        let mut previous = self.kind.to_string();
        let mut cause = self.source();
        while let Some(err) = cause {
            let message = err.to_string();
            if message != previous {
                out.push_str(&format!("Caused by: {message}\n"));
            }
            previous = message;
            cause = err.source();
        }
        out
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err.to_string())).with_cause(err)
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The shell was assembled incorrectly (e.g. duplicate command names).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed meta-command arguments.
    #[error("{0}")]
    Usage(String),

    /// A meta-command name that is not registered.
    #[error("No such command '{0}'.")]
    NoSuchCommand(String),

    /// One or more named entities do not exist.
    #[error("{}", render_not_found(.entity, .names))]
    NotFound {
        /// What sort of entity was looked up.
        entity: EntityKind,
        /// Every name that failed to resolve.
        names: Vec<String>,
    },

    /// A model number that is not an integer.
    #[error("Invalid model number: {0}")]
    InvalidModelNumber(String),

    /// The engine rejected or failed a statement.
    #[error("query failed: {0}")]
    Query(String),

    /// The backend does not implement the requested operation.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A CSV file or codebook was malformed or inconsistent with the catalog.
    #[error("load failed: {0}")]
    Load(String),

    /// Reading or writing a file or terminal failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// A sandboxed expression could not be evaluated.
    #[error("evaluation error: {0}")]
    Eval(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Returns true for input and lookup errors, which are reported as a
    /// single line rather than a full diagnostic.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Usage(_)
                | Self::NoSuchCommand(_)
                | Self::NotFound { .. }
                | Self::InvalidModelNumber(_)
        )
    }
}

/// Kinds of catalog entity that can be looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A table in the storage layer.
    Table,
    /// A generator (a family of models over a table).
    Generator,
    /// A model, identified by number within a generator.
    Model,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Table => "table",
            Self::Generator => "generator",
            Self::Model => "model",
        };
        f.write_str(name)
    }
}

fn render_not_found(entity: &EntityKind, names: &[String]) -> String {
    names
        .iter()
        .map(|name| match entity {
            // model numbers are printed bare
            EntityKind::Model => format!("No such {entity}: {name}"),
            EntityKind::Table | EntityKind::Generator => format!("No such {entity}: '{name}'"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Statement text or file the error relates to.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Operations that were in progress, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line number.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
            writeln!(f)?;
        }
        for frame in &self.stack {
            writeln!(f, "  in {frame}")?;
        }
        Ok(())
    }
}
