//! Bqlsh Storage - the engine boundary.
//!
//! This crate provides:
//! - The [`Database`] trait the shell executes through
//! - Savepoint scopes and trace hooks
//! - [`SqliteDatabase`], a SQLite-backed engine with the metadata catalog
//! - [`MockDatabase`], a recording collaborator for tests
//! - CSV and codebook file parsing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod database;
pub mod error;
pub mod loader;
pub mod mock;
pub mod sqlite;

pub use database::{Database, TraceHook, TraceKind, quote_identifier, with_savepoint};
pub use error::{StorageError, StorageResult};
pub use loader::{CodebookEntry, CsvTable, read_codebook, read_codebook_file, read_csv, read_csv_file};
pub use mock::{Call, CallLog, MockDatabase};
pub use sqlite::SqliteDatabase;
