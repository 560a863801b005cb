//! End-to-end shell sessions over SQLite

use std::fs;

use bqlsh_runtime::FAREWELL;

use crate::run_sqlite;

// =============================================================================
// Statements
// =============================================================================

#[test]
fn bql_statement_over_several_lines() {
    let out = run_sqlite("SELECT 1 AS one,\n  'x' AS two\n;\n");
    assert_eq!(out, format!("one | two\n----+----\n  1 |   x\n{FAREWELL}"));
}

#[test]
fn several_statements_on_one_line() {
    let out = run_sqlite("SELECT 1 AS a; SELECT 2 AS b;\n");
    assert_eq!(out, format!("a\n-\n1\nb\n-\n2\n{FAREWELL}"));
}

#[test]
fn sql_command_reaches_storage() {
    let out = run_sqlite(".sql CREATE TABLE t (x);\n.sql INSERT INTO t VALUES (5);\n.sql SELECT x FROM t;\n");
    assert_eq!(out, format!("x\n-\n5\n{FAREWELL}"));
}

#[test]
fn sql_command_without_semicolon_runs_at_once() {
    let out = run_sqlite(".sql SELECT 42 AS answer\n.help quit\n");
    assert!(out.starts_with("answer\n------\n    42\n.quit\n"), "{out}");
}

#[test]
fn padded_eof_line_ends_session() {
    let out = run_sqlite(" EOF \nSELECT 2 AS b;\n");
    assert_eq!(out, FAREWELL);
}

#[test]
fn failure_prints_diagnostic_and_continues() {
    let out = run_sqlite("SELECT * FROM nowhere;\nSELECT 3 AS n;\n");
    assert!(out.starts_with("Error: query failed:"), "{out}");
    assert!(out.contains("no such table: nowhere"));
    assert!(out.ends_with(&format!("n\n-\n3\n{FAREWELL}")));
}

#[test]
fn modelling_statement_is_reported() {
    let out = run_sqlite("ESTIMATE PREDICTIVE PROBABILITY OF x FROM g;\n");
    assert!(out.starts_with("Error: unsupported:"), "{out}");
}

#[test]
fn end_of_input_discards_pending_statement() {
    let out = run_sqlite(".sql CREATE TABLE t (x);\nINSERT INTO t VALUES (1)\n");
    assert_eq!(out, FAREWELL);
}

// =============================================================================
// Tracing
// =============================================================================

#[test]
fn bql_trace_shows_statement_then_result() {
    let out = run_sqlite(".trace bql\nSELECT 1 AS x;\n.untrace bql\nSELECT 2 AS y;\n");
    assert_eq!(
        out,
        format!("--> SELECT 1 AS x ()\nx\n-\n1\ny\n-\n2\n{FAREWELL}")
    );
}

#[test]
fn sql_trace_shows_parameters() {
    let out = run_sqlite(".trace sql\n.sql SELECT 7 AS n;\n");
    assert!(out.starts_with("==> SELECT 7 AS n ()\n"), "{out}");
}

// =============================================================================
// Files and Describe
// =============================================================================

#[test]
fn csv_then_describe_table() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("people.csv");
    fs::write(&data, "name,age\nalice,30\n").unwrap();

    let out = run_sqlite(&format!(
        ".csv people {}\n.describe table people\n.describe tables nosuch\n",
        data.display()
    ));
    assert_eq!(
        out,
        format!(
            "tabname | colno | name | shortname\n\
             --------+-------+------+----------\n \
              people |     0 | name |      NULL\n \
              people |     1 |  age |      NULL\n\
             No such table: 'nosuch'\n{FAREWELL}"
        )
    );
}

#[test]
fn codebook_shows_in_describe() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("d.csv");
    let codebook = dir.path().join("cb.csv");
    fs::write(&data, "a\n1\n").unwrap();
    fs::write(
        &codebook,
        "column_label,short_name,description,value_map\na,Alpha,First,\n",
    )
    .unwrap();

    let out = run_sqlite(&format!(
        ".csv d {}\n.codebook d {}\n.describe table d\n",
        data.display(),
        codebook.display()
    ));
    assert!(out.contains("     d |     0 |    a |     Alpha\n"), "{out}");
}

#[test]
fn describe_missing_generator_and_models() {
    let out = run_sqlite(".describe columns g\n.describe models\n.describe generators\n");
    assert_eq!(
        out,
        format!(
            "No such generator: 'g'\n\
             Describe models of what generator?\n\
             id | name | tabname | metamodel\n\
             ---+------+---------+----------\n\
             {FAREWELL}"
        )
    );
}

#[test]
fn describe_models_of_catalogued_generator() {
    let script = "\
.sql INSERT INTO bayesdb_generator (id, name, tabname, metamodel) VALUES (1, 'g', 't', 'crosscat');
.sql INSERT INTO bayesdb_generator_model (generator_id, modelno, iterations) VALUES (1, 0, 30);
.sql INSERT INTO bayesdb_generator_model (generator_id, modelno, iterations) VALUES (1, 1, 40);
.describe models g 1
.describe models g 2
.describe models g one
";
    let out = run_sqlite(script);
    assert_eq!(
        out,
        format!(
            "modelno | iterations\n\
             --------+-----------\n      \
                   1 |         40\n\
             No such model: 2\n\
             Invalid model number: one\n{FAREWELL}"
        )
    );
}

#[test]
fn bad_arguments_print_usage() {
    let out = run_sqlite(".csv onlyone\n.trace everything\n.describe\n.describe gizmos\n");
    assert_eq!(
        out,
        format!(
            "Usage: .csv <table> </path/to/data.csv>\n\
             Trace what?\n\
             Describe what, pray tell?\n\
             I don't know what a 'gizmos' is.\n{FAREWELL}"
        )
    );
}

// =============================================================================
// Expressions and Help
// =============================================================================

#[test]
fn python_sees_pending_statement() {
    let out = run_sqlite("SELECT 4\n.python len(pending)\n AS n;\n");
    assert_eq!(out, format!("9\nn\n-\n4\n{FAREWELL}"));
}

#[test]
fn python_overflow_is_reported() {
    let out = run_sqlite(".python (-9223372036854775807 - 1) % -1\nSELECT 1 AS still_alive;\n");
    assert!(out.starts_with("Error: evaluation error: integer overflow\n"), "{out}");
    assert!(out.contains("still_alive\n-----------\n          1\n"), "{out}");
}

#[test]
fn describe_kind_ignores_case() {
    let out = run_sqlite(".describe TABLES\n.describe Generators\n");
    assert_eq!(
        out,
        format!(
            "tabname | colno | name | shortname\n\
             --------+-------+------+----------\n\
             id | name | tabname | metamodel\n\
             ---+------+---------+----------\n{FAREWELL}"
        )
    );
}

#[test]
fn help_for_commands() {
    let out = run_sqlite(".help csv nosuch\n");
    assert_eq!(
        out,
        format!(
            ".csv <table> </path/to/data.csv>\n\n\
             Create a SQL table named <table> from the data in\n\
             </path/to/data.csv>.\n\
             No such command 'nosuch'.\n{FAREWELL}"
        )
    );
}

#[test]
fn quit_ends_without_farewell() {
    let out = run_sqlite(".quit\nSELECT 1;\n");
    assert_eq!(out, "");
}
