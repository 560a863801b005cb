//! Integration tests for Error types
//!
//! Tests error construction, display, classification, and diagnostics.

use bqlsh_foundation::{EntityKind, Error, ErrorContext, ErrorKind};

// =============================================================================
// User Errors
// =============================================================================

#[test]
fn usage_errors_print_verbatim() {
    let err = Error::usage("Usage: .csv <table> </path/to/data.csv>");
    assert!(err.is_user_error());
    assert_eq!(err.to_string(), "Usage: .csv <table> </path/to/data.csv>");
}

#[test]
fn no_such_command() {
    let err = Error::no_such_command(".frob");
    assert!(err.is_user_error());
    assert_eq!(err.to_string(), "No such command '.frob'.");
}

#[test]
fn not_found_quotes_names_but_not_model_numbers() {
    let err = Error::not_found(EntityKind::Generator, vec!["g".into()]);
    assert_eq!(err.to_string(), "No such generator: 'g'");
    let err = Error::not_found(EntityKind::Model, vec!["4".into()]);
    assert_eq!(err.to_string(), "No such model: 4");
    let err = Error::not_found(EntityKind::Table, vec!["a".into(), "b".into()]);
    assert_eq!(err.to_string(), "No such table: 'a'\nNo such table: 'b'");
}

#[test]
fn invalid_model_number() {
    let err = Error::new(ErrorKind::InvalidModelNumber("x".into()));
    assert!(err.is_user_error());
    assert_eq!(err.to_string(), "Invalid model number: x");
}

// =============================================================================
// Execution Errors
// =============================================================================

#[test]
fn execution_errors_are_not_user_errors() {
    for err in [
        Error::query("no such column: q"),
        Error::unsupported("ESTIMATE"),
        Error::load("bad header"),
        Error::eval("unknown name"),
        Error::config("duplicate"),
    ] {
        assert!(!err.is_user_error(), "{err}");
    }
}

#[test]
fn diagnostic_includes_frames_and_causes() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err = Error::query("failed")
        .with_cause(io)
        .with_frame("executing SELECT 1")
        .with_frame(".sql");
    let text = err.diagnostic();
    assert!(text.starts_with("Error: query failed: failed\n"));
    assert!(text.contains("  in executing SELECT 1\n"));
    assert!(text.contains("  in .sql\n"));
    assert!(text.ends_with("Caused by: gone\n"));
}

#[test]
fn context_with_source_and_line() {
    let err = Error::load("ragged row").with_context(
        ErrorContext::new()
            .with_source("data.csv")
            .with_line(3),
    );
    assert!(err.diagnostic().contains("at data.csv:3\n"));
}

#[test]
fn io_errors_convert() {
    let err: Error = std::io::Error::other("disk").into();
    assert!(matches!(err.kind, ErrorKind::Io(_)));
    assert!(err.to_string().contains("disk"));
}
