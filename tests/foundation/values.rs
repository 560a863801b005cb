//! Integration tests for Value
//!
//! Tests conversions, display, and literal rendering.

use bqlsh_foundation::{Value, render_params};

// =============================================================================
// Conversions
// =============================================================================

#[test]
fn from_primitives() {
    assert_eq!(Value::from(7_i64), Value::Integer(7));
    assert_eq!(Value::from(1.5), Value::Real(1.5));
    assert_eq!(Value::from("x"), Value::Text("x".into()));
    assert_eq!(Value::from(String::from("y")), Value::Text("y".into()));
    assert_eq!(Value::from(vec![1_u8, 2]), Value::Blob(vec![1, 2]));
}

#[test]
fn from_option() {
    assert_eq!(Value::from(None::<String>), Value::Null);
    assert_eq!(Value::from(Some("a".to_string())), Value::Text("a".into()));
}

#[test]
fn accessors() {
    assert!(Value::Null.is_null());
    assert_eq!(Value::Integer(3).as_integer(), Some(3));
    assert_eq!(Value::Integer(3).as_real(), Some(3.0));
    assert_eq!(Value::Text("t".into()).as_text(), Some("t"));
    assert_eq!(Value::Real(0.5).as_integer(), None);
    assert_eq!(Value::Blob(vec![]).type_name(), "blob");
}

// =============================================================================
// Display and Literals
// =============================================================================

#[test]
fn display_is_bare() {
    assert_eq!(Value::Null.to_string(), "NULL");
    assert_eq!(Value::Real(2.0).to_string(), "2.0");
    assert_eq!(Value::Real(0.25).to_string(), "0.25");
    assert_eq!(Value::Text("it's".into()).to_string(), "it's");
}

#[test]
fn literals_are_quoted() {
    assert_eq!(Value::Text("it's".into()).to_literal(), "'it''s'");
    assert_eq!(Value::Blob(vec![0xab, 0x01]).to_literal(), "x'ab01'");
    assert_eq!(Value::Integer(-4).to_literal(), "-4");
}

#[test]
fn params_render_as_tuple() {
    assert_eq!(render_params(&[]), "()");
    assert_eq!(render_params(&[Value::from("x")]), "('x')");
    assert_eq!(
        render_params(&[Value::Integer(1), Value::Null, Value::from("b")]),
        "(1, NULL, 'b')"
    );
}
