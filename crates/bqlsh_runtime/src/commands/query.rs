//! `.sql` and `.python`: statements outside the default BQL path.

use bqlsh_foundation::Result;

use crate::accumulator::Language;
use crate::registry::Control;
use crate::session::Session;

pub(crate) const SQL_SUMMARY: &str = "execute a SQL query";
pub(crate) const SQL_USAGE: &[&str] = &[
    "<query>",
    "",
    "Execute a SQL query on the underlying SQLite database.",
];

pub(crate) const PYTHON_SUMMARY: &str = "evaluate an expression";
pub(crate) const PYTHON_USAGE: &[&str] = &[
    "<expression>",
    "",
    "Evaluate an expression in a sandbox and print its value.",
    "",
    "`bql_traced' and `sql_traced' are 1 when the corresponding trace is on,",
    "`pending' is the text of any unfinished statement, and `commands' is",
    "the number of installed commands.",
];

/// `.sql <query>`: runs raw SQL, continuing on the next lines only while a
/// quote, comment, or trigger body is left open.
///
/// # Errors
///
/// Returns execution errors, or a usage error if another statement is
/// pending.
pub fn sql(session: &mut Session, args: &str) -> Result<Control> {
    session.begin_statement(Language::Sql, args)
}

/// `.python <expression>`: evaluates an expression in the sandbox.
///
/// # Errors
///
/// Returns evaluation errors, or a usage error if another statement is
/// pending.
pub fn python(session: &mut Session, args: &str) -> Result<Control> {
    session.begin_statement(Language::Expression, args)
}
