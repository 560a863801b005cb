//! Integration tests for the storage layer
//!
//! Tests for the SQLite backend, file ingestion, and the mock collaborator.

mod ingest;
mod loader;
mod mock;
mod sqlite;

use std::fs;
use std::path::{Path, PathBuf};

/// Writes `contents` to `name` inside `dir` and returns the path.
pub fn fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
