//! `.trace` and `.untrace`.

use bqlsh_foundation::{Error, Result};
use bqlsh_storage::TraceKind;

use crate::registry::Control;
use crate::session::Session;

pub(crate) const TRACE_SUMMARY: &str = "trace queries";
pub(crate) const TRACE_USAGE: &[&str] = &[
    "[bql|sql]",
    "",
    "Trace BQL or SQL queries executed in the database.",
    "Use `.untrace' to undo.",
];

pub(crate) const UNTRACE_SUMMARY: &str = "untrace queries";
pub(crate) const UNTRACE_USAGE: &[&str] = &[
    "[bql|sql]",
    "",
    "Untrace BQL or SQL queries executed in the database after",
    "`.trace' traced them.",
];

/// `.trace bql|sql`
///
/// # Errors
///
/// Returns `Trace what?` for any other argument.
pub fn trace(session: &mut Session, args: &str) -> Result<Control> {
    let kind = TraceKind::parse(args).ok_or_else(|| Error::usage("Trace what?"))?;
    session.adapter_mut().set_trace(kind, true);
    Ok(Control::Continue)
}

/// `.untrace bql|sql`
///
/// # Errors
///
/// Returns `Untrace what?` for any other argument.
pub fn untrace(session: &mut Session, args: &str) -> Result<Control> {
    let kind = TraceKind::parse(args).ok_or_else(|| Error::usage("Untrace what?"))?;
    session.adapter_mut().set_trace(kind, false);
    Ok(Control::Continue)
}
