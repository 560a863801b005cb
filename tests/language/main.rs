//! Integration tests for the language layer
//!
//! Tests for statement scanning, completeness oracles, result printing, and
//! the expression evaluator.

mod completeness;
mod expressions;
mod printing;
mod scanning;
