//! The reserved built-ins: `.help` and `.quit`.

use std::io::Write;

use bqlsh_foundation::{Error, Result};

use crate::registry::{CommandDescriptor, CommandRegistry, Control, SENTINEL};
use crate::session::Session;

pub(crate) const HELP_SUMMARY: &str = "show help for commands";
pub(crate) const HELP_USAGE: &[&str] = &[
    "[<cmd> ...]",
    "",
    "Show help for commands.  With no arguments, list all commands.",
];

pub(crate) const QUIT_SUMMARY: &str = "leave the shell";
pub(crate) const QUIT_USAGE: &[&str] = &["", "", "End the session without waiting for end of input."];

/// `.help [name...]`
///
/// # Errors
///
/// Returns a lookup error at the first unknown name; help for the names before
/// it has already been printed.
pub fn help(session: &mut Session, args: &str) -> Result<Control> {
    let names: Vec<&str> = args.split_whitespace().collect();
    if names.is_empty() {
        let listing = render_listing(session.registry());
        session.out().write_all(listing.as_bytes())?;
        return Ok(Control::Continue);
    }

    for name in names {
        let usage = match session.registry().resolve(name) {
            Ok(descriptor) => render_usage(descriptor),
            Err(_) => return Err(Error::no_such_command(name)),
        };
        session.out().write_all(usage.as_bytes())?;
    }
    Ok(Control::Continue)
}

/// `.quit`
///
/// # Errors
///
/// Never fails.
pub fn quit(_session: &mut Session, _args: &str) -> Result<Control> {
    Ok(Control::Quit)
}

/// Renders the `.help` overview: every command, sorted, with its summary.
#[must_use]
pub fn render_listing(registry: &CommandRegistry) -> String {
    let pad = registry
        .list_names()
        .iter()
        .map(|name| name.len() + 1)
        .max()
        .unwrap_or(0);
    let mut text = String::new();
    for descriptor in registry.descriptors() {
        let label = format!("{SENTINEL}{}", descriptor.name());
        text.push_str(&format!(" {label:>pad$}    {}\n", descriptor.summary()));
    }
    text.push_str("Type `.help <cmd>' for help on the command <cmd>.\n");
    text
}

/// Renders the usage block for one command.
#[must_use]
pub fn render_usage(descriptor: &CommandDescriptor) -> String {
    let mut text = format!("{SENTINEL}{}", descriptor.name());
    let mut lines = descriptor.usage().iter();
    if let Some(synopsis) = lines.next().filter(|s| !s.is_empty()) {
        text.push(' ');
        text.push_str(synopsis);
    }
    for line in lines {
        text.push('\n');
        text.push_str(line);
    }
    text.push('\n');
    text
}
