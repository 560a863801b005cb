//! Pretty-printer for result cursors.
//!
//! Renders a [`Cursor`] as right-aligned columns separated by ` | `, with a
//! `-+-` rule under the header:
//!
//! ```text
//! tabname | colno | name
//! --------+-------+-----
//!       t |     0 |    a
//! ```

use std::io::{self, Write};

use bqlsh_foundation::Cursor;

/// Writes `cursor` to `out`. Cursors without a description print nothing.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn pp_cursor(out: &mut dyn Write, cursor: &Cursor) -> io::Result<()> {
    if !cursor.has_description() {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = cursor
        .rows()
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    pp_list(out, &rows, cursor.columns())
}

/// Writes a table of already-rendered cells under `labels`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn pp_list(out: &mut dyn Write, rows: &[Vec<String>], labels: &[String]) -> io::Result<()> {
    let mut widths: Vec<usize> = labels.iter().map(|l| display_width(l)).collect();
    for row in rows {
        for (colno, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(colno) {
                *width = (*width).max(display_width(cell));
            }
        }
    }

    write_row(out, labels, &widths)?;
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");
    writeln!(out, "{rule}")?;
    for row in rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

/// Renders `cursor` into a string.
#[must_use]
pub fn format_cursor(cursor: &Cursor) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = pp_cursor(&mut buf, cursor);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_row(out: &mut dyn Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad_left(cell, *width))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(out, "{line}")
}

fn pad_left(cell: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(cell));
    format!("{}{cell}", " ".repeat(pad))
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}
