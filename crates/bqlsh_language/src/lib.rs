//! Statement scanning, completeness oracles, result formatting, and the
//! sandboxed expression evaluator for bqlsh.
//!
//! This crate provides:
//! - [`Scanner`] - Lexical scanner for BQL/SQL text
//! - [`Completeness`] - The completeness-oracle interface and its
//!   implementations, [`StatementCompleteness`], [`LexicalCompleteness`], and
//!   [`BracketCompleteness`]
//! - [`pp_cursor`] - Column-aligned result printing
//! - [`evaluate`] - Expression evaluation over explicit [`Bindings`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod complete;
pub mod expr;
pub mod pretty;
pub mod scanner;
pub mod span;
pub mod token;

pub use complete::{BracketCompleteness, Completeness, LexicalCompleteness, StatementCompleteness};
pub use expr::{Bindings, evaluate};
pub use pretty::{format_cursor, pp_cursor, pp_list};
pub use scanner::{KEYWORDS, Scanner, is_keyword, leading_words, split_statements};
pub use span::Span;
pub use token::{Token, TokenKind, Unterminated};
