//! Integration tests for CSV and codebook ingestion into SQLite

use bqlsh_foundation::{ErrorKind, Value};
use bqlsh_storage::{Database, SqliteDatabase};

use crate::fixture;

const PEOPLE: &str = "name,age,city\nalice,30,paris\nbob,,rome\n";
const CODEBOOK: &str = "column_label,short_name,description,value_map\n\
                        city,City,Where they live,\"{\"\"paris\"\": \"\"Paris, FR\"\"}\"\n\
                        age,Age,Years,NaN\n";

#[test]
fn csv_creates_table_and_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "people.csv", PEOPLE);
    let mut db = SqliteDatabase::open_in_memory().unwrap();

    db.read_csv("people", &path).unwrap();

    let cursor = db
        .sql_execute("SELECT name, age FROM people ORDER BY name", &[])
        .unwrap();
    assert_eq!(
        cursor.rows(),
        [
            vec![Value::from("alice"), Value::Integer(30)],
            vec![Value::from("bob"), Value::Null]
        ]
    );
    let columns = db
        .sql_execute(
            "SELECT name FROM bayesdb_column WHERE tabname = 'people' ORDER BY colno",
            &[],
        )
        .unwrap();
    assert_eq!(columns.len(), 3);
}

#[test]
fn csv_refuses_existing_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "people.csv", PEOPLE);
    let mut db = SqliteDatabase::open_in_memory().unwrap();
    db.read_csv("people", &path).unwrap();

    let err = db.read_csv("people", &path).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Load(_)));
}

#[test]
fn ragged_csv_leaves_no_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "bad.csv", "a,b\n1,2\n3\n");
    let mut db = SqliteDatabase::open_in_memory().unwrap();

    assert!(db.read_csv("bad", &path).is_err());
    assert!(!db.has_table("bad").unwrap());
}

#[test]
fn missing_csv_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = SqliteDatabase::open_in_memory().unwrap();
    let err = db.read_csv("t", &dir.path().join("nope.csv")).unwrap_err();
    assert!(err.diagnostic().contains("nope.csv"));
}

#[test]
fn codebook_sets_names_and_value_maps() {
    let dir = tempfile::tempdir().unwrap();
    let data = fixture(dir.path(), "people.csv", PEOPLE);
    let codebook = fixture(dir.path(), "codebook.csv", CODEBOOK);
    let mut db = SqliteDatabase::open_in_memory().unwrap();
    db.read_csv("people", &data).unwrap();

    db.load_codebook("people", &codebook).unwrap();

    let cursor = db
        .sql_execute(
            "SELECT name, shortname, description FROM bayesdb_column \
             WHERE tabname = 'people' AND shortname IS NOT NULL ORDER BY colno",
            &[],
        )
        .unwrap();
    assert_eq!(
        cursor.rows(),
        [
            vec![Value::from("age"), Value::from("Age"), Value::from("Years")],
            vec![
                Value::from("city"),
                Value::from("City"),
                Value::from("Where they live")
            ]
        ]
    );
    let map = db
        .sql_execute("SELECT key, value FROM bayesdb_column_map", &[])
        .unwrap();
    assert_eq!(map.rows(), [vec![Value::from("paris"), Value::from("Paris, FR")]]);
}

#[test]
fn codebook_for_unknown_table() {
    let dir = tempfile::tempdir().unwrap();
    let codebook = fixture(dir.path(), "codebook.csv", CODEBOOK);
    let mut db = SqliteDatabase::open_in_memory().unwrap();
    let err = db.load_codebook("nosuch", &codebook).unwrap_err();
    assert_eq!(err.to_string(), "No such table: 'nosuch'");
}

#[test]
fn codebook_with_unknown_column_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let data = fixture(dir.path(), "people.csv", PEOPLE);
    let codebook = fixture(
        dir.path(),
        "codebook.csv",
        "column_label,short_name,description,value_map\n\
         name,Name,Given name,\n\
         height,Height,cm,\n",
    );
    let mut db = SqliteDatabase::open_in_memory().unwrap();
    db.read_csv("people", &data).unwrap();

    let err = db.load_codebook("people", &codebook).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Load(_)));
    let named = db
        .sql_execute("SELECT COUNT(*) FROM bayesdb_column WHERE shortname IS NOT NULL", &[])
        .unwrap();
    assert_eq!(named.scalar(), Some(&Value::Integer(0)));
}

#[test]
fn legacy_models_are_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = SqliteDatabase::open_in_memory().unwrap();
    let err = db
        .load_legacy_models("g", "t", &dir.path().join("m.pkl.gz"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Unsupported(_)));
}
