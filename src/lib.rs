//! bqlsh - Interactive shell for BQL and SQL
//!
//! This crate re-exports all layers of the bqlsh system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: bqlsh_runtime    - Session, commands, line editing, REPL, CLI
//! Layer 2: bqlsh_storage    - Database trait, SQLite backend, CSV/codebook loading
//! Layer 1: bqlsh_language   - Scanner, completeness, pretty printing, expressions
//! Layer 0: bqlsh_foundation - Core types (Value, Cursor, Error)
//! ```

pub use bqlsh_foundation as foundation;
pub use bqlsh_language as language;
pub use bqlsh_runtime as runtime;
pub use bqlsh_storage as storage;
