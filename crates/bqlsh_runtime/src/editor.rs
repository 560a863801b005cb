//! Line editor abstraction for the shell.
//!
//! The [`Repl`](crate::Repl) reads through [`LineEditor`], so the terminal
//! editor can be swapped for a plain reader in batch mode or a scripted one in
//! tests.

use std::borrow::Cow;
use std::io::BufRead;
use std::path::PathBuf;

use bqlsh_foundation::{Error, ErrorKind, Result};
use bqlsh_language::KEYWORDS;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator};
use tracing::{debug, warn};

use crate::highlight::BqlHighlighter;
use crate::registry::SENTINEL;

/// Result of reading a line from the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// A line was read (without its terminator).
    Line(String),
    /// The user pressed Ctrl+C.
    Interrupted,
    /// Input ended.
    Eof,
}

/// Abstraction over line editing.
pub trait LineEditor {
    /// Reads a line after showing the primary prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Reads a continuation line of a pending statement.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Adds a line to history.
    fn add_history(&mut self, line: &str);

    /// Replaces the completion candidates.
    fn set_keywords(&mut self, keywords: Vec<String>);

    /// Writes history to wherever it persists, if anywhere.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be written.
    fn persist_history(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Helper for rustyline: completion, hints, and highlighting.
#[derive(Helper, Completer, Hinter, Validator)]
struct BqlshHelper {
    #[rustyline(Completer)]
    completer: BqlshCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    highlighter: BqlHighlighter,
}

impl Highlighter for BqlshHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

/// Completes dot-commands, keywords, and the path arguments of commands.
struct BqlshCompleter {
    file_completer: FilenameCompleter,
    keywords: Vec<String>,
}

impl BqlshCompleter {
    fn new() -> Self {
        Self {
            file_completer: FilenameCompleter::new(),
            keywords: KEYWORDS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Candidates for `word`, matched case-insensitively and returned in the
    /// case the user started typing in.
    fn candidates(&self, word: &str) -> Vec<Pair> {
        let lower = word.chars().next().is_some_and(char::is_lowercase);
        self.keywords
            .iter()
            .filter(|kw| {
                kw.len() >= word.len()
                    && kw.is_char_boundary(word.len())
                    && kw[..word.len()].eq_ignore_ascii_case(word)
            })
            .map(|kw| {
                let text = if lower && !kw.starts_with(SENTINEL) {
                    kw.to_lowercase()
                } else {
                    kw.clone()
                };
                Pair {
                    display: text.clone(),
                    replacement: text,
                }
            })
            .collect()
    }
}

impl Completer for BqlshCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let start = head
            .rfind(|c: char| c.is_whitespace() || "(),;".contains(c))
            .map_or(0, |i| i + 1);
        let word = &head[start..];

        // arguments of a dot-command are table names and paths
        let trimmed = head.trim_start();
        if trimmed.starts_with(SENTINEL) && trimmed.contains(char::is_whitespace) {
            return self.file_completer.complete(line, pos, ctx);
        }
        if word.is_empty() {
            return Ok((start, Vec::new()));
        }
        Ok((start, self.candidates(word)))
    }
}

/// Line editor backed by rustyline, with optional persistent history.
pub struct RustylineEditor {
    editor: Editor<BqlshHelper, DefaultHistory>,
    history_file: Option<PathBuf>,
}

impl RustylineEditor {
    /// Creates an editor without persistent history.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline initialization fails.
    pub fn new() -> Result<Self> {
        Self::with_history(None, 1000)
    }

    /// Creates an editor that loads history from `history_file` (if any) and
    /// keeps at most `history_size` entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the size is invalid or rustyline initialization
    /// fails. A missing or unreadable history file is not an error.
    pub fn with_history(history_file: Option<PathBuf>, history_size: usize) -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(history_size)
            .map_err(|e| Error::config(format!("invalid history size {history_size}: {e}")))?
            .build();

        let helper = BqlshHelper {
            completer: BqlshCompleter::new(),
            hinter: HistoryHinter::new(),
            highlighter: BqlHighlighter::new(),
        };

        let mut editor = Editor::with_config(config)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?;
        editor.set_helper(Some(helper));

        if let Some(path) = &history_file {
            match editor.load_history(path) {
                Ok(()) => debug!(path = %path.display(), "loaded history"),
                Err(e) => debug!(path = %path.display(), error = %e, "no history loaded"),
            }
        }

        Ok(Self {
            editor,
            history_file,
        })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::new(ErrorKind::Io(e.to_string()))),
        }
    }

    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult> {
        self.read_line(prompt)
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            warn!(error = %e, "could not add history entry");
        }
    }

    fn set_keywords(&mut self, keywords: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completer.keywords = keywords;
        }
    }

    fn persist_history(&mut self) -> Result<()> {
        let Some(path) = &self.history_file else {
            return Ok(());
        };
        self.editor.save_history(path).map_err(|e| {
            Error::new(ErrorKind::Io(e.to_string()))
                .with_frame(format!("saving history to {}", path.display()))
        })
    }
}

/// Reads lines from any buffered reader, showing no prompts.
///
/// Used for batch mode, where input comes from a pipe or file.
#[derive(Debug)]
pub struct StdinEditor<R> {
    reader: R,
}

impl<R: BufRead> StdinEditor<R> {
    /// Wraps a reader.
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineEditor for StdinEditor<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(ReadResult::Eof);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(ReadResult::Line(line))
    }

    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult> {
        self.read_line(prompt)
    }

    fn add_history(&mut self, _line: &str) {}

    fn set_keywords(&mut self, _keywords: Vec<String>) {}
}
