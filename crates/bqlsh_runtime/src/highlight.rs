//! Syntax highlighting for the shell.

use std::borrow::Cow;

use bqlsh_language::{Scanner, TokenKind, is_keyword};

use crate::registry::SENTINEL;

const RESET: &str = "\x1b[0m";
const COMMAND: &str = "\x1b[1;32m";
const KEYWORD: &str = "\x1b[32m";
const STRING: &str = "\x1b[33m";
const NUMBER: &str = "\x1b[35m";
const PARAMETER: &str = "\x1b[34m";
const COMMENT: &str = "\x1b[2;3m";
const IDENTIFIER: &str = "\x1b[36m";

/// Highlighter for BQL/SQL input and dot-commands.
#[derive(Debug, Default)]
pub struct BqlHighlighter;

impl BqlHighlighter {
    /// Creates a new highlighter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Highlights a line of input.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.trim().is_empty() {
            return Cow::Borrowed(line);
        }
        let mut result = String::with_capacity(line.len() * 2);
        let mut rest = line;

        let indent = line.len() - line.trim_start().len();
        if line[indent..].starts_with(SENTINEL) {
            let body = &line[indent..];
            let end = body.find(char::is_whitespace).unwrap_or(body.len());
            result.push_str(&line[..indent]);
            paint(&mut result, COMMAND, &body[..end]);
            rest = &body[end..];
        }

        let mut cursor = 0;
        for token in Scanner::tokenize_all(rest) {
            let span = token.span;
            result.push_str(&rest[cursor..span.start]);
            let text = &rest[span.start..span.end];
            let color = match &token.kind {
                TokenKind::Word(word) if is_keyword(word) => Some(KEYWORD),
                TokenKind::String(_) => Some(STRING),
                TokenKind::Number(_) => Some(NUMBER),
                TokenKind::Parameter(_) => Some(PARAMETER),
                TokenKind::Comment | TokenKind::Unterminated(_) => Some(COMMENT),
                TokenKind::QuotedIdentifier(_) => Some(IDENTIFIER),
                _ => None,
            };
            match color {
                Some(color) => paint(&mut result, color, text),
                None => result.push_str(text),
            }
            cursor = span.end;
        }
        result.push_str(&rest[cursor..]);
        Cow::Owned(result)
    }
}

fn paint(out: &mut String, color: &str, text: &str) {
    out.push_str(color);
    out.push_str(text);
    out.push_str(RESET);
}
