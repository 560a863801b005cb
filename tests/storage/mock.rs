//! Integration tests for the mock database

use bqlsh_foundation::{Cursor, Value};
use bqlsh_storage::{Call, Database, MockDatabase, with_savepoint};

#[test]
fn canned_cursor_for_matching_text() {
    let cursor = Cursor::new(["n"]).with_rows([vec![Value::Integer(1)]]);
    let mut db = MockDatabase::new().respond("COUNT", cursor.clone());
    assert_eq!(db.execute("SELECT COUNT(*) FROM t", &[]).unwrap(), cursor);
    assert_eq!(db.execute("SELECT 1", &[]).unwrap(), Cursor::empty());
}

#[test]
fn failed_scope_logs_rollback() {
    let mut db = MockDatabase::new().failing_on("boom");
    let log = db.log();
    let result = with_savepoint(&mut db, |db| db.sql_execute("SELECT boom", &[]));
    assert!(result.is_err());
    assert_eq!(
        log.calls(),
        [
            Call::SavepointBegin,
            Call::SqlExecute {
                text: "SELECT boom".into(),
                params: vec![]
            },
            Call::SavepointRollback
        ]
    );
}

#[test]
fn read_csv_registers_table() {
    let mut db = MockDatabase::new();
    db.read_csv("t", std::path::Path::new("t.csv")).unwrap();
    assert!(db.has_table("t").unwrap());
}
