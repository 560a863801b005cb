//! `.csv`, `.codebook`, and `.loadmodels`: file ingestion.

use std::path::Path;

use bqlsh_foundation::{Error, Result};

use super::tokens;
use crate::registry::Control;
use crate::session::Session;

pub(crate) const CSV_SUMMARY: &str = "create table from CSV file";
pub(crate) const CSV_USAGE: &[&str] = &[
    "<table> </path/to/data.csv>",
    "",
    "Create a SQL table named <table> from the data in",
    "</path/to/data.csv>.",
];

pub(crate) const CODEBOOK_SUMMARY: &str = "load codebook for table";
pub(crate) const CODEBOOK_USAGE: &[&str] = &[
    "<table> </path/to/codebook.csv>",
    "",
    "Load a codebook -- short names, descriptions, and value",
    "descriptions for the columns of a table -- from a CSV file.",
];

pub(crate) const LOADMODELS_SUMMARY: &str = "load legacy models";
pub(crate) const LOADMODELS_USAGE: &[&str] = &[
    "<generator> <table> </path/to/models.pkl.gz>",
    "",
    "Create a Crosscat generator named <generator> for the table",
    "<table> from the legacy models stored in",
    "</path/to/models.pkl.gz>.",
];

/// `.csv <table> <path>`
///
/// # Errors
///
/// Returns a usage error for the wrong number of arguments, or the load
/// error.
pub fn csv(session: &mut Session, args: &str) -> Result<Control> {
    let [table, path] = tokens(args)[..] else {
        return Err(Error::usage("Usage: .csv <table> </path/to/data.csv>"));
    };
    session.adapter_mut().database().read_csv(table, Path::new(path))?;
    Ok(Control::Continue)
}

/// `.codebook <table> <path>`
///
/// # Errors
///
/// Returns a usage error for the wrong number of arguments, or the load
/// error.
pub fn codebook(session: &mut Session, args: &str) -> Result<Control> {
    let [table, path] = tokens(args)[..] else {
        return Err(Error::usage(
            "Usage: .codebook <table> </path/to/codebook.csv>",
        ));
    };
    session
        .adapter_mut()
        .database()
        .load_codebook(table, Path::new(path))?;
    Ok(Control::Continue)
}

/// `.loadmodels <generator> <table> <path>`
///
/// # Errors
///
/// Returns a usage error for the wrong number of arguments, or the load
/// error.
pub fn loadmodels(session: &mut Session, args: &str) -> Result<Control> {
    let [generator, table, path] = tokens(args)[..] else {
        return Err(Error::usage(
            "Usage: .loadmodels <generator> <table> </path/to/models.pkl.gz>",
        ));
    };
    session
        .adapter_mut()
        .database()
        .load_legacy_models(generator, table, Path::new(path))?;
    Ok(Control::Continue)
}
