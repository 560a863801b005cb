//! Statement accumulation.
//!
//! Input arrives one line at a time. The [`Accumulator`] buffers lines until
//! the completeness oracle for the pending language accepts the buffer, then
//! hands the whole statement back and returns to idle.
//!
//! ```text
//! Idle --incomplete line--> Accumulating --incomplete line--> Accumulating
//!   ^                            |
//!   +-------completing line------+   (statement yielded, buffer cleared)
//! ```

use std::fmt;

use bqlsh_foundation::{Error, Result};
use bqlsh_language::{BracketCompleteness, Completeness, LexicalCompleteness, StatementCompleteness};
use tracing::debug;

/// Prompt shown when no statement is pending.
pub const DEFAULT_PROMPT: &str = "bayeslite> ";
/// Prompt shown while a BQL statement is pending.
pub const BQL_PROMPT: &str = "   bql...> ";
/// Prompt shown while a raw SQL statement is pending.
pub const SQL_PROMPT: &str = "   sql...> ";
/// Prompt shown while an expression is pending.
pub const PYTHON_PROMPT: &str = "python...> ";

/// The language a pending statement is written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    /// BQL, executed through the engine.
    Bql,
    /// Raw SQL, executed against the storage layer.
    Sql,
    /// A sandboxed expression.
    Expression,
}

impl Language {
    /// The prompt shown while a statement in this language is pending.
    #[must_use]
    pub const fn continuation_prompt(self) -> &'static str {
        match self {
            Self::Bql => BQL_PROMPT,
            Self::Sql => SQL_PROMPT,
            Self::Expression => PYTHON_PROMPT,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bql => "BQL",
            Self::Sql => "SQL",
            Self::Expression => "expression",
        }
    }
}

/// A complete statement ready for execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    /// Language the statement was typed in.
    pub language: Language,
    /// Full text, every line newline-terminated.
    pub text: String,
}

/// Outcome of feeding a line to the accumulator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Append {
    /// The buffer became complete; the accumulator is idle again.
    Complete(Statement),
    /// More input is needed.
    Incomplete,
    /// The line was blank and nothing was pending.
    Ignored,
}

/// Buffers input lines until they form a complete statement.
pub struct Accumulator {
    buffer: String,
    language: Option<Language>,
    bql: Box<dyn Completeness>,
    sql: Box<dyn Completeness>,
    expression: Box<dyn Completeness>,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator {
    /// Creates an idle accumulator with the standard oracles.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            language: None,
            bql: Box::new(StatementCompleteness),
            sql: Box::new(LexicalCompleteness),
            expression: Box::new(BracketCompleteness),
        }
    }

    /// Replaces the oracle used for `language`.
    #[must_use]
    pub fn with_oracle(mut self, language: Language, oracle: impl Completeness + 'static) -> Self {
        let slot = match language {
            Language::Bql => &mut self.bql,
            Language::Sql => &mut self.sql,
            Language::Expression => &mut self.expression,
        };
        *slot = Box::new(oracle);
        self
    }

    /// Feeds a plain input line.
    ///
    /// The line continues whatever statement is pending, or starts a new BQL
    /// statement. Blank lines are ignored while idle.
    pub fn append(&mut self, line: &str) -> Append {
        if self.is_idle() && line.trim().is_empty() {
            return Append::Ignored;
        }
        let language = self.language.unwrap_or(Language::Bql);
        self.push(language, line)
    }

    /// Feeds the argument of a language-switching command (`.sql`, `.python`).
    ///
    /// While idle, or while a statement in the same language is pending, the
    /// text is appended like a plain line. While a statement in another
    /// language is pending, a complete `text` is returned for immediate
    /// execution without touching the buffer.
    ///
    /// # Errors
    ///
    /// Returns a usage error if `text` is incomplete and a statement in another
    /// language is pending.
    pub fn begin(&mut self, language: Language, text: &str) -> Result<Append> {
        match self.language {
            None => Ok(self.push(language, text)),
            Some(pending) if pending == language => Ok(self.push(language, text)),
            Some(pending) => {
                let candidate = format!("{text}\n");
                if self.is_complete(language, &candidate) {
                    Ok(Append::Complete(Statement {
                        language,
                        text: candidate,
                    }))
                } else {
                    Err(Error::usage(format!(
                        "A {} statement is still pending; finish it or press ^C first.",
                        pending.name()
                    )))
                }
            }
        }
    }

    /// Asks the oracle for `language` whether `text` is complete.
    #[must_use]
    pub fn is_complete(&self, language: Language, text: &str) -> bool {
        let oracle = match language {
            Language::Bql => &self.bql,
            Language::Sql => &self.sql,
            Language::Expression => &self.expression,
        };
        oracle.is_complete(text)
    }

    /// Clears the buffer and restores the default prompt.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.language = None;
    }

    /// Drops any pending statement without executing it.
    pub fn discard(&mut self) -> Option<Statement> {
        let language = self.language?;
        let text = std::mem::take(&mut self.buffer);
        self.reset();
        debug!(language = language.name(), "pending statement discarded");
        Some(Statement { language, text })
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.language.is_none()
    }

    /// Language of the pending statement, if any.
    #[must_use]
    pub const fn language(&self) -> Option<Language> {
        self.language
    }

    /// Text buffered so far.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// The prompt for the current state.
    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        match self.language {
            None => DEFAULT_PROMPT,
            Some(language) => language.continuation_prompt(),
        }
    }

    fn push(&mut self, language: Language, line: &str) -> Append {
        self.buffer.push_str(line);
        self.buffer.push('\n');
        self.language = Some(language);

        if self.is_complete(language, &self.buffer) {
            let text = std::mem::take(&mut self.buffer);
            self.reset();
            debug!(language = language.name(), "statement complete");
            Append::Complete(Statement { language, text })
        } else {
            debug!(language = language.name(), "awaiting continuation");
            Append::Incomplete
        }
    }
}

impl fmt::Debug for Accumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accumulator")
            .field("buffer", &self.buffer)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}
