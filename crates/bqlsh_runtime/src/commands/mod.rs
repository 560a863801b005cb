//! Meta-command handlers.
//!
//! Each command is a plain `fn(&mut Session, &str) -> Result<Control>` plus a
//! summary line and a usage block for `.help`.

pub mod describe;
pub mod help;
pub mod load;
pub mod query;
pub mod trace;

use bqlsh_foundation::Result;

use crate::registry::CommandRegistry;

/// Installs every command except the reserved built-ins.
///
/// # Errors
///
/// Returns a configuration error if any name collides.
pub fn install_standard(registry: &mut CommandRegistry) -> Result<()> {
    registry.install("codebook", load::codebook, load::CODEBOOK_SUMMARY, load::CODEBOOK_USAGE)?;
    registry.install("csv", load::csv, load::CSV_SUMMARY, load::CSV_USAGE)?;
    registry.install("describe", describe::describe, describe::SUMMARY, describe::USAGE)?;
    registry.install(
        "loadmodels",
        load::loadmodels,
        load::LOADMODELS_SUMMARY,
        load::LOADMODELS_USAGE,
    )?;
    registry.install("python", query::python, query::PYTHON_SUMMARY, query::PYTHON_USAGE)?;
    registry.install("sql", query::sql, query::SQL_SUMMARY, query::SQL_USAGE)?;
    registry.install("trace", trace::trace, trace::TRACE_SUMMARY, trace::TRACE_USAGE)?;
    registry.install("untrace", trace::untrace, trace::UNTRACE_SUMMARY, trace::UNTRACE_USAGE)?;
    Ok(())
}

/// Splits command arguments on whitespace.
fn tokens(args: &str) -> Vec<&str> {
    args.split_whitespace().collect()
}
