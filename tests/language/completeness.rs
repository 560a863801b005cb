//! Integration tests for completeness oracles

use bqlsh_language::{BracketCompleteness, Completeness, StatementCompleteness};
use proptest::prelude::*;

const STATEMENT: &str = "SELECT x FROM t WHERE y = 'a;b' -- c;\n  AND z = \"q;\";";

#[test]
fn statement_needs_terminator() {
    let oracle = StatementCompleteness;
    assert!(!oracle.is_complete("SELECT 1\n"));
    assert!(oracle.is_complete("SELECT 1\n;\n"));
    assert!(oracle.is_complete(&format!("{STATEMENT}\n")));
}

#[test]
fn open_quotes_are_incomplete() {
    let oracle = StatementCompleteness;
    assert!(!oracle.is_complete("SELECT 'abc;\n"));
    assert!(!oracle.is_complete("SELECT \"abc;\n"));
    assert!(!oracle.is_complete("SELECT 1; /* ;\n"));
}

#[test]
fn trigger_waits_for_end() {
    let oracle = StatementCompleteness;
    let head = "CREATE TRIGGER t AFTER INSERT ON x BEGIN\n  DELETE FROM y;\n";
    assert!(!oracle.is_complete(head));
    assert!(!oracle.is_complete(&format!("{head}END\n")));
    assert!(oracle.is_complete(&format!("{head}END;\n")));
}

#[test]
fn brackets_balance() {
    let oracle = BracketCompleteness;
    assert!(oracle.is_complete("1 + 2\n"));
    assert!(!oracle.is_complete("(1 +\n"));
    assert!(oracle.is_complete("(1 +\n2)\n"));
    assert!(!oracle.is_complete("'(\n"));
    assert!(oracle.is_complete("')'\n"));
}

#[test]
fn closures_are_oracles() {
    let oracle = |text: &str| text.contains("GO");
    assert!(oracle.is_complete("x\nGO\n"));
    assert!(!Completeness::is_complete(&oracle, "x\n"));
}

proptest! {
    #[test]
    fn every_proper_prefix_is_incomplete(cut in 1usize..STATEMENT.len()) {
        prop_assume!(STATEMENT.is_char_boundary(cut));
        let prefix = &STATEMENT[..cut];
        prop_assume!(!prefix.trim().is_empty());
        prop_assert!(!StatementCompleteness.is_complete(prefix));
    }
}
