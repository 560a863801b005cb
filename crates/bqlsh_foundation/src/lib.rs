//! Core types, values, and errors for bqlsh.
//!
//! This crate provides:
//! - [`Value`] - The cell type for parameters and result rows
//! - [`Cursor`] - A materialized result set
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cursor;
pub mod error;
pub mod value;

pub use cursor::Cursor;
pub use error::{EntityKind, Error, ErrorContext, ErrorKind};
pub use value::{Value, render_params};

/// Result type alias using bqlsh's Error.
pub type Result<T> = std::result::Result<T, Error>;
