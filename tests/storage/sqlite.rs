//! Integration tests for the SQLite backend
//!
//! Tests statement execution, savepoints, tracing, and the catalog.

use std::cell::RefCell;
use std::rc::Rc;

use bqlsh_foundation::{Error, ErrorKind, Value};
use bqlsh_storage::{Database, SqliteDatabase, TraceHook, TraceKind, with_savepoint};

fn db() -> SqliteDatabase {
    SqliteDatabase::open_in_memory().unwrap()
}

// =============================================================================
// Execution
// =============================================================================

#[test]
fn values_round_trip_through_storage_classes() {
    let mut db = db();
    let cursor = db
        .sql_execute(
            "SELECT ? AS i, ? AS r, ? AS t, ? AS n",
            &[Value::Integer(3), Value::Real(0.5), Value::from("x"), Value::Null],
        )
        .unwrap();
    assert_eq!(cursor.columns(), ["i", "r", "t", "n"]);
    assert_eq!(
        cursor.rows()[0],
        vec![Value::Integer(3), Value::Real(0.5), Value::from("x"), Value::Null]
    );
}

#[test]
fn syntax_errors_carry_the_statement() {
    let mut db = db();
    let err = db.sql_execute("SELEKT 1", &[]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Query(_)));
    assert!(err.diagnostic().contains("executing SELEKT 1"));
}

#[test]
fn modelling_statements_need_the_engine() {
    let mut db = db();
    for bql in [
        "ESTIMATE PREDICTIVE PROBABILITY OF x FROM g",
        "create temp generator g for t using crosscat(x numerical)",
        "DROP MODELS FROM g",
    ] {
        let err = db.execute(bql, &[]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Unsupported(_)), "{bql}");
    }
}

#[test]
fn file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.bdb");
    {
        let mut db = SqliteDatabase::open(Some(&path)).unwrap();
        db.sql_execute("CREATE TABLE t (x)", &[]).unwrap();
        db.sql_execute("INSERT INTO t VALUES (41)", &[]).unwrap();
    }
    let mut db = SqliteDatabase::open(Some(&path)).unwrap();
    let cursor = db.sql_execute("SELECT x + 1 FROM t", &[]).unwrap();
    assert_eq!(cursor.scalar(), Some(&Value::Integer(42)));
    assert!(db.location().contains("test.bdb"));
}

// =============================================================================
// Savepoints
// =============================================================================

#[test]
fn nested_savepoints_roll_back_independently() {
    let mut db = db();
    db.sql_execute("CREATE TABLE t (x)", &[]).unwrap();

    with_savepoint(&mut db, |outer| {
        outer.sql_execute("INSERT INTO t VALUES (1)", &[])?;
        let inner: Result<(), Error> = with_savepoint(outer, |inner| {
            inner.sql_execute("INSERT INTO t VALUES (2)", &[])?;
            Err(Error::query("abandon inner"))
        });
        assert!(inner.is_err());
        Ok(())
    })
    .unwrap();

    let cursor = db.sql_execute("SELECT x FROM t", &[]).unwrap();
    assert_eq!(cursor.rows(), [vec![Value::Integer(1)]]);
    assert_eq!(db.savepoint_depth(), 0);
}

#[test]
fn unbalanced_release_is_an_error() {
    let mut db = db();
    assert!(db.savepoint_release().is_err());
    assert!(db.savepoint_rollback().is_err());
}

// =============================================================================
// Tracing
// =============================================================================

#[test]
fn hooks_see_text_and_parameters() {
    let mut db = db();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let hook: TraceHook = Rc::new(move |text: &str, params: &[Value]| {
        sink.borrow_mut().push(format!("{text} {}", params.len()));
    });

    db.trace(TraceKind::Sql, Rc::clone(&hook));
    db.sql_execute("SELECT ?", &[Value::Integer(1)]).unwrap();
    db.untrace(TraceKind::Sql, &hook);
    db.sql_execute("SELECT 2", &[]).unwrap();

    assert_eq!(*seen.borrow(), ["SELECT ? 1"]);
}

#[test]
fn savepoints_are_not_traced() {
    let mut db = db();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let hook: TraceHook = Rc::new(move |_: &str, _: &[Value]| *sink.borrow_mut() += 1);
    db.trace(TraceKind::Sql, hook);
    with_savepoint(&mut db, |_| Ok(())).unwrap();
    assert_eq!(*count.borrow(), 0);
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn table_lookup_ignores_case() {
    let mut db = db();
    db.sql_execute("CREATE TABLE People (name)", &[]).unwrap();
    assert!(db.has_table("people").unwrap());
    assert!(!db.has_table("places").unwrap());
}

#[test]
fn generators_and_models() {
    let mut db = db();
    db.sql_execute(
        "INSERT INTO bayesdb_generator (id, name, tabname, metamodel) VALUES (5, 'g', 't', 'crosscat')",
        &[],
    )
    .unwrap();
    db.sql_execute(
        "INSERT INTO bayesdb_generator_model (generator_id, modelno, iterations) VALUES (5, 0, 10)",
        &[],
    )
    .unwrap();

    assert!(db.has_generator("G").unwrap());
    assert_eq!(db.generator_id("g").unwrap(), Some(5));
    assert_eq!(db.generator_id("h").unwrap(), None);
    assert!(db.generator_has_model(5, 0).unwrap());
    assert!(!db.generator_has_model(5, 1).unwrap());
}

#[test]
fn guarantee_columns_is_idempotent() {
    let mut db = db();
    db.sql_execute("CREATE TABLE t (a, b)", &[]).unwrap();
    db.table_guarantee_columns("t").unwrap();
    db.table_guarantee_columns("t").unwrap();
    let cursor = db
        .sql_execute(
            "SELECT colno, name FROM bayesdb_column WHERE tabname = 't' ORDER BY colno",
            &[],
        )
        .unwrap();
    assert_eq!(
        cursor.rows(),
        [
            vec![Value::Integer(0), Value::from("a")],
            vec![Value::Integer(1), Value::from("b")]
        ]
    );
}
