//! The read loop.

use std::io::Write;

use bqlsh_foundation::Result;
use bqlsh_language::KEYWORDS;
use tracing::{info, warn};

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::registry::{Control, SENTINEL};
use crate::session::Session;

/// Printed once before the first prompt.
pub const BANNER: &str = "Welcome to the Bayeslite shell.\nType `.help' for help.\n";

/// A line that, once trimmed, ends the session exactly as end of input does.
const EOF_LINE: &str = "EOF";

/// The interactive shell: reads lines from an editor and feeds them to a
/// [`Session`].
pub struct Repl<E: LineEditor = RustylineEditor> {
    editor: E,
    session: Session,
    show_banner: bool,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL with the default rustyline editor and no persistent
    /// history.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(session: Session) -> Result<Self> {
        Ok(Self::with_editor(RustylineEditor::new()?, session))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL reading from `editor`.
    pub fn with_editor(editor: E, session: Session) -> Self {
        Self {
            editor,
            session,
            show_banner: true,
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets whether the welcome banner is printed.
    #[must_use]
    pub fn with_banner(mut self, show: bool) -> Self {
        self.show_banner = show;
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Consumes the REPL, returning its session.
    #[must_use]
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Runs until end of input or `.quit`.
    ///
    /// Errors from handlers and statements are reported and the loop goes
    /// on; only failures to read input or write output end it early.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the terminal fails.
    pub fn run(&mut self) -> Result<()> {
        info!("session started");
        if self.show_banner {
            write!(self.session.out(), "{BANNER}")?;
            self.session.out().flush()?;
        }
        let words = completion_words(&self.session);
        self.editor.set_keywords(words);

        let outcome = loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        if let Err(e) = self.editor.persist_history() {
            warn!(error = %e, "could not save history");
        }
        info!("session ended");
        outcome
    }

    /// Reads and handles one line. Returns false once the session is over.
    fn step(&mut self) -> Result<bool> {
        let prompt = self.session.prompt();
        let read = if self.session.is_accumulating() {
            self.editor.read_continuation(prompt)?
        } else {
            self.editor.read_line(prompt)?
        };

        let line = match read {
            ReadResult::Line(line) if line.trim() != EOF_LINE => line,
            ReadResult::Line(_) | ReadResult::Eof => {
                self.session.end_of_input()?;
                return Ok(false);
            }
            ReadResult::Interrupted => {
                self.session.interrupt()?;
                return Ok(true);
            }
        };

        if !line.trim().is_empty() {
            self.editor.add_history(&line);
        }
        let keep_going = match self.session.handle_line(&line) {
            Ok(Control::Continue) => true,
            Ok(Control::Quit) => false,
            Err(e) => {
                self.session.report(&e)?;
                true
            }
        };
        self.session.out().flush()?;
        Ok(keep_going)
    }
}

impl<E: LineEditor> std::fmt::Debug for Repl<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repl")
            .field("session", &self.session)
            .field("show_banner", &self.show_banner)
            .finish_non_exhaustive()
    }
}

/// Dot-command names followed by the language keywords.
fn completion_words(session: &Session) -> Vec<String> {
    session
        .registry()
        .list_names()
        .into_iter()
        .map(|name| format!("{SENTINEL}{name}"))
        .chain(KEYWORDS.iter().map(ToString::to_string))
        .collect()
}
