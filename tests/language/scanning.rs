//! Integration tests for the scanner
//!
//! Tests tokenization, statement splitting, and leading-word extraction.

use bqlsh_language::{Scanner, TokenKind, Unterminated, leading_words, split_statements};
use proptest::prelude::*;

// =============================================================================
// Tokens
// =============================================================================

#[test]
fn parameters_and_quoted_identifiers() {
    let kinds: Vec<TokenKind> = Scanner::tokenize_all("SELECT \"a b\" FROM t WHERE x = ?1 AND y = :name")
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| matches!(k, TokenKind::Parameter(_) | TokenKind::QuotedIdentifier(_)))
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::QuotedIdentifier("a b".into()),
            TokenKind::Parameter("?1".into()),
            TokenKind::Parameter(":name".into()),
        ]
    );
}

#[test]
fn open_block_comment_is_unterminated() {
    let tokens = Scanner::tokenize_all("SELECT /* still typing");
    assert!(
        tokens
            .iter()
            .any(|t| t.kind == TokenKind::Unterminated(Unterminated::BlockComment))
    );
}

#[test]
fn spans_cover_source_text() {
    let source = "SELECT name\n  FROM people;";
    for token in Scanner::tokenize_all(source) {
        assert!(token.span.start <= token.span.end);
        assert!(token.span.end <= source.len());
    }
}

// =============================================================================
// Splitting
// =============================================================================

#[test]
fn split_drops_empty_statements() {
    assert_eq!(split_statements(";;  ; "), Vec::<&str>::new());
    assert_eq!(split_statements("SELECT 1;\n;\nSELECT 2"), vec!["SELECT 1", "SELECT 2"]);
}

#[test]
fn split_ignores_semicolons_in_comments() {
    assert_eq!(
        split_statements("SELECT 1 -- a; b\n; SELECT /* ; */ 2;"),
        vec!["SELECT 1 -- a; b", "SELECT /* ; */ 2"]
    );
}

#[test]
fn temp_trigger_body_stays_whole() {
    let text = "CREATE TEMP TRIGGER t AFTER DELETE ON x BEGIN DELETE FROM y; DELETE FROM z; END;";
    assert_eq!(split_statements(text).len(), 1);
}

#[test]
fn leading_words_skip_comments() {
    assert_eq!(
        leading_words("-- note\ncreate temp generator g", 3),
        vec!["CREATE", "TEMP", "GENERATOR"]
    );
    assert_eq!(leading_words("SELECT", 3), vec!["SELECT"]);
}

proptest! {
    #[test]
    fn split_recovers_joined_statements(values in prop::collection::vec(0u32..10_000, 1..20)) {
        let statements: Vec<String> = values.iter().map(|v| format!("SELECT {v}")).collect();
        let text = statements.join(";\n");
        prop_assert_eq!(split_statements(&text), statements);
    }
}
