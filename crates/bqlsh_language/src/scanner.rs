//! Scanner for BQL and SQL statement text.
//!
//! The scanner does not understand the grammar of either language. It only
//! knows enough lexical structure (quotes, comments, terminators) to find
//! statement boundaries and to classify words for highlighting.

use crate::complete::in_trigger_body;
use crate::span::Span;
use crate::token::{Token, TokenKind, Unterminated};

/// Reserved words of BQL and the SQL dialect underneath it.
pub const KEYWORDS: &[&str] = &[
    "ALTER", "ANALYZE", "AND", "AS", "ASC", "BEGIN", "BETWEEN", "BY", "CHECKPOINT", "COLUMN",
    "COLUMNS", "COMMIT", "CONF", "CORRELATION", "CREATE", "DEPENDENCE", "DESC", "DISTINCT",
    "DROP", "ELSE", "END", "ESTIMATE", "EXISTS", "EXPLAIN", "FOR", "FROM", "GENERATOR",
    "GIVEN", "GROUP", "HAVING", "IF", "IN", "INFER", "INITIALIZE", "INSERT", "INTO", "IS",
    "ITERATIONS", "JOIN", "LIKE", "LIMIT", "MINUTES", "MODEL", "MODELS", "MUTUAL",
    "NOT", "NULL", "OF", "OFFSET", "ON", "OR", "ORDER", "PAIRWISE", "PREDICT", "PREDICTIVE",
    "PROBABILITY", "RENAME", "ROLLBACK", "ROW", "ROWS", "SAVEPOINT", "SECONDS", "SELECT",
    "SET", "SIMILARITY", "SIMULATE", "TABLE", "TEMP", "TEMPORARY", "THEN", "TO", "TRIGGER",
    "TYPICALITY", "UPDATE", "USING", "VALUES", "WAIT", "WHEN", "WHERE", "WITH",
];

/// Returns true if `word` is a BQL or SQL keyword (case-insensitive).
#[must_use]
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(word))
}

/// Scanner over statement text.
pub struct Scanner<'src> {
    /// Source text being scanned.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Scanner<'src> {
    /// Creates a new scanner for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the source this scanner was built over.
    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column),
            );
        };

        let kind = match c {
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            '\'' => self.scan_string(),
            '"' => self.scan_quoted('"', '"'),
            '`' => self.scan_quoted('`', '`'),
            '[' => self.scan_quoted('[', ']'),
            '-' if self.peek_char_n(1) == Some('-') => self.scan_line_comment(),
            '/' if self.peek_char_n(1) == Some('*') => self.scan_block_comment(),
            '?' => self.scan_parameter(),
            ':' | '@' | '$'
                if self
                    .peek_char_n(1)
                    .is_some_and(|n| n.is_alphanumeric() || n == '_') =>
            {
                self.scan_parameter()
            }
            c if c.is_ascii_digit() => self.scan_number(),
            '.' if self.peek_char_n(1).is_some_and(|n| n.is_ascii_digit()) => self.scan_number(),
            c if is_word_start(c) => self.scan_word(),
            _ => self.scan_punct(),
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
        )
    }

    /// Tokenizes all source and returns a vector of tokens ending in `Eof`.
    ///
    /// Comments are included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        let len = c.len_utf8();
        self.rest = &self.rest[len..];
        self.position += len;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans a single-quoted string; `''` inside is an escaped quote.
    fn scan_string(&mut self) -> TokenKind {
        self.advance();
        let mut text = String::new();
        loop {
            match self.advance() {
                None => return TokenKind::Unterminated(Unterminated::String),
                Some('\'') => {
                    if self.peek_char() == Some('\'') {
                        self.advance();
                        text.push('\'');
                    } else {
                        return TokenKind::String(text);
                    }
                }
                Some(c) => text.push(c),
            }
        }
    }

    /// Scans a quoted identifier. Doubling the closing delimiter escapes it,
    /// except for `[...]` which has no escape.
    fn scan_quoted(&mut self, open: char, close: char) -> TokenKind {
        self.advance();
        let mut text = String::new();
        loop {
            match self.advance() {
                None => return TokenKind::Unterminated(Unterminated::Identifier),
                Some(c) if c == close => {
                    if open != '[' && self.peek_char() == Some(close) {
                        self.advance();
                        text.push(close);
                    } else {
                        return TokenKind::QuotedIdentifier(text);
                    }
                }
                Some(c) => text.push(c),
            }
        }
    }

    fn scan_line_comment(&mut self) -> TokenKind {
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::Comment
    }

    fn scan_block_comment(&mut self) -> TokenKind {
        self.advance();
        self.advance();
        loop {
            match self.advance() {
                None => return TokenKind::Unterminated(Unterminated::BlockComment),
                Some('*') if self.peek_char() == Some('/') => {
                    self.advance();
                    return TokenKind::Comment;
                }
                Some(_) => {}
            }
        }
    }

    fn scan_parameter(&mut self) -> TokenKind {
        let start = self.position;
        self.advance();
        while self
            .peek_char()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        TokenKind::Parameter(self.source[start..self.position].to_string())
    }

    fn scan_number(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            let exponent_sign = (c == '+' || c == '-')
                && self.source[start..self.position]
                    .chars()
                    .last()
                    .is_some_and(|p| p == 'e' || p == 'E');
            if c.is_ascii_alphanumeric() || c == '.' || exponent_sign {
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Number(self.source[start..self.position].to_string())
    }

    fn scan_word(&mut self) -> TokenKind {
        let start = self.position;
        while self.peek_char().is_some_and(is_word_continue) {
            self.advance();
        }
        TokenKind::Word(self.source[start..self.position].to_string())
    }

    fn scan_punct(&mut self) -> TokenKind {
        let start = self.position;
        let first = self.advance().unwrap_or_default();
        // Two-character operators
        if let Some(next) = self.peek_char() {
            let pair = matches!(
                (first, next),
                ('<', '=' | '>' | '<') | ('>', '=' | '>') | ('!' | '=', '=') | ('|', '|')
            );
            if pair {
                self.advance();
            }
        }
        TokenKind::Punct(self.source[start..self.position].to_string())
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Returns the first `n` words of the first statement in `text`, uppercased,
/// skipping comments.
#[must_use]
pub fn leading_words(text: &str, n: usize) -> Vec<String> {
    let mut scanner = Scanner::new(text);
    let mut words = Vec::with_capacity(n);
    while words.len() < n {
        let token = scanner.next_token();
        match token.kind {
            TokenKind::Word(w) => words.push(w.to_ascii_uppercase()),
            TokenKind::Comment => {}
            _ => break,
        }
    }
    words
}

/// Splits `text` into statements at top-level semicolons, dropping empty
/// statements. Each returned statement excludes its terminator.
#[must_use]
pub fn split_statements(text: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut scanner = Scanner::new(text);
    let mut start = 0;
    let mut current: Vec<Token> = Vec::new();
    loop {
        let token = scanner.next_token();
        match token.kind {
            TokenKind::Eof => {
                if !current.is_empty() {
                    statements.push(text[start..].trim());
                }
                return statements;
            }
            TokenKind::Semicolon if in_trigger_body(&current) => current.push(token),
            TokenKind::Semicolon => {
                if !current.is_empty() {
                    statements.push(text[start..token.span.start].trim());
                }
                start = token.span.end;
                current.clear();
            }
            TokenKind::Comment => {}
            _ => current.push(token),
        }
    }
}
