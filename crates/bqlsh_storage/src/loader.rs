//! CSV and codebook file parsing.
//!
//! These functions only read and validate files; storing the result is the
//! backend's job.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use crate::error::{StorageError, StorageResult};

/// Header expected on the first row of a codebook file.
pub const CODEBOOK_HEADER: [&str; 4] = ["column_label", "short_name", "description", "value_map"];

/// A parsed data file: column names from the header plus rows of cells.
///
/// Empty cells are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Column names, in file order.
    pub columns: Vec<String>,
    /// Data rows, each exactly as wide as `columns`.
    pub rows: Vec<Vec<Option<String>>>,
}

/// One row of a codebook.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodebookEntry {
    /// Column the entry describes.
    pub column: String,
    /// Short display name.
    pub shortname: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Code → label map for categorical columns.
    pub value_map: BTreeMap<String, String>,
}

/// Reads a CSV file with a header row.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has no header, repeats a
/// column name, or has a row of the wrong width.
pub fn read_csv_file(path: &Path) -> StorageResult<CsvTable> {
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Reads CSV data with a header row from any reader.
///
/// # Errors
///
/// See [`read_csv_file`].
pub fn read_csv<R: Read>(input: R) -> StorageResult<CsvTable> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input);
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(StorageError::invalid("missing header row"));
    }
    let mut seen = HashSet::new();
    for column in &columns {
        if column.is_empty() {
            return Err(StorageError::invalid("empty column name in header"));
        }
        if !seen.insert(column.to_lowercase()) {
            return Err(StorageError::invalid(format!("duplicate column name: {column}")));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                .collect(),
        );
    }
    Ok(CsvTable { columns, rows })
}

/// Reads a codebook file.
///
/// # Errors
///
/// Returns an error if the header is wrong, a row does not have four
/// fields, or a value map is not a JSON object.
pub fn read_codebook_file(path: &Path) -> StorageResult<Vec<CodebookEntry>> {
    let file = std::fs::File::open(path)?;
    read_codebook(file)
}

/// Reads codebook data from any reader.
///
/// # Errors
///
/// See [`read_codebook_file`].
pub fn read_codebook<R: Read>(input: R) -> StorageResult<Vec<CodebookEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    if header != CODEBOOK_HEADER {
        return Err(StorageError::invalid(format!(
            "wrong codebook header, expected {}",
            CODEBOOK_HEADER.join(",")
        )));
    }

    let mut entries = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != CODEBOOK_HEADER.len() {
            // header is line 1
            return Err(StorageError::invalid(format!(
                "codebook line {} has {} fields, expected {}",
                index + 2,
                record.len(),
                CODEBOOK_HEADER.len()
            )));
        }
        let non_empty = |i: usize| {
            record
                .get(i)
                .filter(|cell| !cell.is_empty())
                .map(ToString::to_string)
        };
        let column = non_empty(0).ok_or_else(|| {
            StorageError::invalid(format!("codebook line {} has no column label", index + 2))
        })?;
        entries.push(CodebookEntry {
            column,
            shortname: non_empty(1),
            description: non_empty(2),
            value_map: parse_value_map(record.get(3).unwrap_or_default())?,
        });
    }
    Ok(entries)
}

fn parse_value_map(text: &str) -> StorageResult<BTreeMap<String, String>> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        return Ok(BTreeMap::new());
    }
    let json: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Object(map) = json else {
        return Err(StorageError::invalid(format!("value map is not an object: {text}")));
    };
    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let label = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, label)
        })
        .collect())
}
