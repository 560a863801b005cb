//! Token types produced by the statement scanner.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Returns true for tokens that carry statement content, i.e. anything
    /// other than comments, terminators, and end of input.
    #[must_use]
    pub const fn is_significant(&self) -> bool {
        !matches!(
            self.kind,
            TokenKind::Comment | TokenKind::Semicolon | TokenKind::Eof
        )
    }

    /// Returns true if this token is the given keyword (case-insensitive).
    #[must_use]
    pub fn is_word(&self, keyword: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

/// Which quoting construct was left open at end of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unterminated {
    /// `'...`
    String,
    /// `"...`, `` `... ``, or `[...`
    Identifier,
    /// `/* ...`
    BlockComment,
}

/// Token types for BQL and SQL text.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Bare word: keyword or identifier.
    Word(String),
    /// Numeric literal, kept as written.
    Number(String),
    /// Single-quoted string literal with quotes removed and `''` unescaped.
    String(String),
    /// Quoted identifier with its delimiters removed.
    QuotedIdentifier(String),
    /// `?`, `?NNN`, `:name`, `@name`, or `$name`.
    Parameter(String),
    /// Statement terminator `;`.
    Semicolon,
    /// Any other operator or punctuation character sequence.
    Punct(String),
    /// `-- ...` or `/* ... */`.
    Comment,
    /// A quote or comment that was still open when input ran out.
    Unterminated(Unterminated),
    /// End of input.
    Eof,
}
