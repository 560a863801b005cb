//! Integration tests for the foundation layer
//!
//! Tests for core types: Value, Cursor, and Error.

mod cursors;
mod errors;
mod values;
