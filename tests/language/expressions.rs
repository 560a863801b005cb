//! Integration tests for the expression evaluator

use bqlsh_foundation::{ErrorKind, Value};
use bqlsh_language::{Bindings, evaluate};

fn eval(source: &str) -> Value {
    evaluate(source, &Bindings::new()).unwrap()
}

#[test]
fn literals() {
    assert_eq!(eval("42"), Value::Integer(42));
    assert_eq!(eval("2.5"), Value::Real(2.5));
    assert_eq!(eval("'x'"), Value::from("x"));
    assert_eq!(eval("None"), Value::Null);
    assert_eq!(eval("True"), Value::Integer(1));
}

#[test]
fn functions() {
    assert_eq!(eval("str(12) + 'a'"), Value::from("12a"));
    assert_eq!(eval("abs(-3)"), Value::Integer(3));
    assert_eq!(eval("len('abc') * 2"), Value::Integer(6));
}

#[test]
fn session_style_bindings() {
    let bindings = Bindings::new()
        .with("bql_traced", 0_i64)
        .with("sql_traced", 1_i64)
        .with("pending", "SELECT")
        .with("commands", 10_i64);
    assert_eq!(
        evaluate("sql_traced and not bql_traced", &bindings).unwrap(),
        Value::Integer(1)
    );
    assert_eq!(
        evaluate("len(pending) + commands", &bindings).unwrap(),
        Value::Integer(16)
    );
}

#[test]
fn nothing_outside_the_bindings_is_visible() {
    for source in ["os", "__import__('os')", "open('/etc/passwd')"] {
        let err = evaluate(source, &Bindings::new()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Eval(_)), "{source}");
    }
}
