//! `.describe`: catalog metadata for tables, generators, columns, and models.
//!
//! Every lookup and query runs inside one savepoint. Missing entities are
//! reported before any metadata query is issued.

use bqlsh_foundation::{EntityKind, Error, ErrorKind, Result, Value};
use bqlsh_storage::Database;

use super::tokens;
use crate::registry::Control;
use crate::session::Session;

pub(crate) const SUMMARY: &str = "describe entities in the database";
pub(crate) const USAGE: &[&str] = &[
    "table(s)|generator(s)|columns|model(s) [<name>...]",
    "",
    "Print a human-readable description of the specified entities.",
    "With no names, `table(s)' and `generator(s)' describe every one.",
    "`columns <generator>' lists the modelled columns of a generator, and",
    "`models <generator> [<modelno>...]' lists its models.",
];

const TABLES_SQL: &str = "SELECT tabname, colno, name, shortname FROM bayesdb_column";
const GENERATORS_SQL: &str = "SELECT id, name, tabname, metamodel FROM bayesdb_generator";
const COLUMNS_SQL: &str = "SELECT c.colno AS colno, c.name AS name, gc.stattype AS stattype, \
                           c.shortname AS shortname \
                           FROM bayesdb_generator AS g \
                           JOIN bayesdb_generator_column AS gc ON gc.generator_id = g.id \
                           JOIN bayesdb_column AS c ON c.tabname = g.tabname AND c.colno = gc.colno \
                           WHERE g.id = ? \
                           ORDER BY c.colno ASC";
const MODELS_SQL: &str = "SELECT modelno, iterations FROM bayesdb_generator_model";

/// `.describe <kind> [names...]`
///
/// # Errors
///
/// Returns a usage error for a missing or unknown kind, a lookup error for
/// missing entities or bad model numbers, or the query error.
pub fn describe(session: &mut Session, args: &str) -> Result<Control> {
    let words = tokens(args);
    let Some((&kind, names)) = words.split_first() else {
        return Err(Error::usage("Describe what, pray tell?"));
    };
    match kind.to_lowercase().as_str() {
        "table" | "tables" => describe_tables(session, names)?,
        "generator" | "generators" => describe_generators(session, names)?,
        "columns" => describe_columns(session, names)?,
        "model" | "models" => describe_models(session, names)?,
        _ => return Err(Error::usage(format!("I don't know what a '{kind}' is."))),
    }
    Ok(Control::Continue)
}

fn describe_tables(session: &mut Session, names: &[&str]) -> Result<()> {
    session.adapter_mut().in_savepoint(|db, out| {
        let missing = missing(names, |name| db.has_table(name))?;
        if !missing.is_empty() {
            return Err(Error::not_found(EntityKind::Table, missing));
        }
        for name in names {
            db.table_guarantee_columns(name)?;
        }
        let sql = format!(
            "{TABLES_SQL} WHERE {} ORDER BY tabname ASC, colno ASC",
            qualifier("tabname", names.len())
        );
        let cursor = db.execute(&sql, &text_params(names))?;
        Ok(bqlsh_language::pp_cursor(out, &cursor)?)
    })
}

fn describe_generators(session: &mut Session, names: &[&str]) -> Result<()> {
    session.adapter_mut().in_savepoint(|db, out| {
        let missing = missing(names, |name| db.has_generator(name))?;
        if !missing.is_empty() {
            return Err(Error::not_found(EntityKind::Generator, missing));
        }
        let sql = format!("{GENERATORS_SQL} WHERE {}", qualifier("name", names.len()));
        let cursor = db.execute(&sql, &text_params(names))?;
        Ok(bqlsh_language::pp_cursor(out, &cursor)?)
    })
}

fn describe_columns(session: &mut Session, names: &[&str]) -> Result<()> {
    let [generator] = names else {
        return Err(Error::usage("Describe columns of what generator?"));
    };
    session.adapter_mut().in_savepoint(|db, out| {
        let id = require_generator(db, generator)?;
        let cursor = db.sql_execute(COLUMNS_SQL, &[Value::Integer(id)])?;
        Ok(bqlsh_language::pp_cursor(out, &cursor)?)
    })
}

fn describe_models(session: &mut Session, names: &[&str]) -> Result<()> {
    let Some((&generator, modelnos)) = names.split_first() else {
        return Err(Error::usage("Describe models of what generator?"));
    };
    session.adapter_mut().in_savepoint(|db, out| {
        let id = require_generator(db, generator)?;
        let mut params = vec![Value::Integer(id)];
        for text in modelnos {
            let modelno: i64 = text
                .parse()
                .map_err(|_| Error::new(ErrorKind::InvalidModelNumber((*text).to_string())))?;
            if !db.generator_has_model(id, modelno)? {
                return Err(Error::not_found(EntityKind::Model, vec![modelno.to_string()]));
            }
            params.push(Value::Integer(modelno));
        }
        let filter = if modelnos.is_empty() {
            "1".to_string()
        } else {
            format!("modelno IN ({})", placeholders(modelnos.len()))
        };
        let sql = format!("{MODELS_SQL} WHERE generator_id = ? AND {filter}");
        let cursor = db.sql_execute(&sql, &params)?;
        Ok(bqlsh_language::pp_cursor(out, &cursor)?)
    })
}

fn require_generator(db: &mut dyn Database, name: &str) -> Result<i64> {
    db.generator_id(name)?
        .ok_or_else(|| Error::not_found(EntityKind::Generator, vec![name.to_string()]))
}

/// Names for which `exists` is false, in input order.
fn missing(names: &[&str], mut exists: impl FnMut(&str) -> Result<bool>) -> Result<Vec<String>> {
    let mut absent = Vec::new();
    for name in names {
        if !exists(name)? {
            absent.push((*name).to_string());
        }
    }
    Ok(absent)
}

/// `1` for no names, else `(column = ? OR column = ? ...)`.
fn qualifier(column: &str, count: usize) -> String {
    if count == 0 {
        return "1".to_string();
    }
    let terms = vec![format!("{column} = ?"); count];
    format!("({})", terms.join(" OR "))
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn text_params(names: &[&str]) -> Vec<Value> {
    names.iter().map(|&name| Value::from(name)).collect()
}
