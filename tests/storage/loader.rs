//! Integration tests for CSV and codebook parsing

use bqlsh_storage::{StorageError, read_codebook, read_csv};

#[test]
fn header_cells_are_trimmed_and_blank_cells_are_null() {
    let table = read_csv(" a , b \n1,\n".as_bytes()).unwrap();
    assert_eq!(table.columns, ["a", "b"]);
    assert_eq!(table.rows, [vec![Some("1".to_string()), None]]);
}

#[test]
fn duplicate_columns_ignore_case() {
    let err = read_csv("Name,name\n".as_bytes()).unwrap_err();
    assert!(matches!(err, StorageError::Invalid(_)));
    assert!(err.to_string().contains("duplicate column name"));
}

#[test]
fn empty_input_has_no_header() {
    assert!(read_csv("".as_bytes()).is_err());
}

#[test]
fn codebook_header_is_checked() {
    let err = read_codebook("label,short,desc,map\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("column_label,short_name,description,value_map"));
}

#[test]
fn codebook_rows_need_four_fields() {
    let err = read_codebook(
        "column_label,short_name,description,value_map\nx,X\n".as_bytes(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("codebook line 2 has 2 fields"));
}

#[test]
fn value_maps_must_be_objects() {
    let text = "column_label,short_name,description,value_map\nx,X,desc,[1]\n";
    assert!(read_codebook(text.as_bytes()).is_err());

    let text = "column_label,short_name,description,value_map\n\
                x,X,desc,\"{\"\"1\"\": \"\"one\"\", \"\"2\"\": 2}\"\n";
    let entries = read_codebook(text.as_bytes()).unwrap();
    assert_eq!(entries[0].value_map.get("1").map(String::as_str), Some("one"));
    assert_eq!(entries[0].value_map.get("2").map(String::as_str), Some("2"));
}
