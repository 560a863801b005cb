//! Completeness oracles.
//!
//! An oracle answers one question about buffered input: has the user finished
//! typing a statement? The shell's accumulator treats the answer as the sole
//! authority on statement boundaries.

use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

/// Decides whether buffered text forms a complete statement.
pub trait Completeness {
    /// Returns true if `text` is ready to execute.
    fn is_complete(&self, text: &str) -> bool;
}

impl<F> Completeness for F
where
    F: Fn(&str) -> bool,
{
    fn is_complete(&self, text: &str) -> bool {
        self(text)
    }
}

/// Oracle for BQL and SQL: a statement is complete once every quote and
/// comment is closed and nothing but whitespace or comments follows the last
/// top-level `;`.
///
/// Inside `CREATE [TEMP] TRIGGER`, a `;` only ends the statement when it
/// follows `END`. Whitespace-only text counts as complete, since there is
/// nothing left to wait for.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatementCompleteness;

impl Completeness for StatementCompleteness {
    fn is_complete(&self, text: &str) -> bool {
        let mut scanner = Scanner::new(text);
        let mut current: Vec<Token> = Vec::new();
        loop {
            let token = scanner.next_token();
            match token.kind {
                TokenKind::Eof => return current.is_empty(),
                TokenKind::Unterminated(_) => return false,
                TokenKind::Comment => {}
                TokenKind::Semicolon => {
                    if in_trigger_body(&current) {
                        current.push(token);
                    } else {
                        current.clear();
                    }
                }
                _ => current.push(token),
            }
        }
    }
}

/// Oracle for one-line SQL commands: the text is complete unless a quote or
/// comment is still open or a trigger body has not reached `END`. A closing
/// `;` is optional.
#[derive(Clone, Copy, Debug, Default)]
pub struct LexicalCompleteness;

impl Completeness for LexicalCompleteness {
    fn is_complete(&self, text: &str) -> bool {
        let mut scanner = Scanner::new(text);
        let mut current: Vec<Token> = Vec::new();
        loop {
            let token = scanner.next_token();
            match token.kind {
                TokenKind::Eof => return !in_trigger_body(&current),
                TokenKind::Unterminated(_) => return false,
                TokenKind::Comment => {}
                TokenKind::Semicolon if !in_trigger_body(&current) => current.clear(),
                _ => current.push(token),
            }
        }
    }
}

/// Returns true if `tokens` open a trigger definition whose body has not yet
/// reached `END`.
pub(crate) fn in_trigger_body(tokens: &[Token]) -> bool {
    let mut words = tokens.iter().filter(|t| t.is_significant());
    if !words.next().is_some_and(|t| t.is_word("CREATE")) {
        return false;
    }
    let mut next = words.next();
    if next.is_some_and(|t| t.is_word("TEMP") || t.is_word("TEMPORARY")) {
        next = words.next();
    }
    if !next.is_some_and(|t| t.is_word("TRIGGER")) {
        return false;
    }
    !tokens
        .iter()
        .rev()
        .find(|t| t.is_significant())
        .is_some_and(|t| t.is_word("END"))
}

/// Oracle for expression input: complete when brackets balance and no string
/// literal is left open.
#[derive(Clone, Copy, Debug, Default)]
pub struct BracketCompleteness;

impl Completeness for BracketCompleteness {
    fn is_complete(&self, text: &str) -> bool {
        let mut depth = 0i32;
        let mut quote: Option<char> = None;
        let mut escape_next = false;

        for c in text.chars() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match (quote, c) {
                (Some(_), '\\') => escape_next = true,
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '(' | '[' | '{') => depth += 1,
                (None, ')' | ']' | '}') => depth -= 1,
                (None, _) => {}
            }
        }

        depth <= 0 && quote.is_none()
    }
}
