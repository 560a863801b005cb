//! Integration tests for Cursor
//!
//! Tests construction and access of materialized result sets.

use bqlsh_foundation::{Cursor, Value};

#[test]
fn empty_cursor_has_no_description() {
    let cursor = Cursor::empty();
    assert!(!cursor.has_description());
    assert!(cursor.is_empty());
    assert_eq!(cursor.scalar(), None);
}

#[test]
fn header_without_rows() {
    let cursor = Cursor::new(["a", "b"]);
    assert!(cursor.has_description());
    assert_eq!(cursor.columns(), ["a", "b"]);
    assert_eq!(cursor.len(), 0);
}

#[test]
fn rows_and_lookup() {
    let mut cursor = Cursor::new(["id", "name"])
        .with_rows([vec![Value::Integer(1), Value::from("one")]]);
    cursor.push_row(vec![Value::Integer(2), Value::from("two")]);

    assert_eq!(cursor.len(), 2);
    assert_eq!(cursor.column_index("name"), Some(1));
    assert_eq!(cursor.column_index("missing"), None);
    assert_eq!(cursor.scalar(), Some(&Value::Integer(1)));
    assert_eq!(cursor.rows()[1][1], Value::from("two"));

    let rows = cursor.into_rows();
    assert_eq!(rows.len(), 2);
}
