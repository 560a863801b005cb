//! Integration tests for result printing

use bqlsh_foundation::{Cursor, Value};
use bqlsh_language::{format_cursor, pp_cursor, pp_list};

#[test]
fn columns_are_right_aligned() {
    let cursor = Cursor::new(["tabname", "colno", "name"]).with_rows([
        vec![Value::from("t"), Value::Integer(0), Value::from("a")],
        vec![Value::from("t"), Value::Integer(1), Value::from("bb")],
    ]);
    assert_eq!(
        format_cursor(&cursor),
        "tabname | colno | name\n\
         --------+-------+-----\n      \
         t |     0 |    a\n      \
         t |     1 |   bb\n"
    );
}

#[test]
fn pp_cursor_writes_to_any_sink() {
    let cursor = Cursor::new(["x"]).with_rows([vec![Value::Real(0.5)]]);
    let mut buf = Vec::new();
    pp_cursor(&mut buf, &cursor).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "  x\n---\n0.5\n");
}

#[test]
fn pp_list_takes_rendered_cells() {
    let mut buf = Vec::new();
    pp_list(&mut buf, &[vec!["1".into()]], &["n".to_string()]).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "n\n-\n1\n");
}

#[test]
fn statements_without_results_print_nothing() {
    assert_eq!(format_cursor(&Cursor::empty()), "");
}
