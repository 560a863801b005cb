//! Meta-command registry.
//!
//! Maps command names (without the leading `.`) to handlers. The shell fills
//! the registry once at startup and never changes it afterwards.

use std::collections::BTreeMap;

use bqlsh_foundation::{Error, Result};

use crate::commands;
use crate::session::Session;

/// Prefix that marks a line as a meta-command.
pub const SENTINEL: char = '.';

/// What the dispatch loop should do after a handler returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Keep reading input.
    Continue,
    /// End the session.
    Quit,
}

/// A command handler. Receives the session and the text after the command
/// name.
pub type Handler = fn(&mut Session, &str) -> Result<Control>;

/// An installed command.
#[derive(Clone, Debug)]
pub struct CommandDescriptor {
    name: String,
    handler: Handler,
    summary: String,
    usage: Vec<String>,
}

impl CommandDescriptor {
    /// The command name, without the sentinel.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handler function.
    #[must_use]
    pub fn handler(&self) -> Handler {
        self.handler
    }

    /// One-line summary shown by `.help`.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Argument synopsis followed by the long description.
    #[must_use]
    pub fn usage(&self) -> &[String] {
        &self.usage
    }
}

/// Names installed by [`CommandRegistry::new`] and refused by
/// [`CommandRegistry::install`].
pub const RESERVED: &[&str] = &["help", "quit"];

/// Name → handler map.
#[derive(Clone, Debug)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandDescriptor>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a registry holding only the reserved built-ins.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            commands: BTreeMap::new(),
        };
        registry.insert("help", commands::help::help, commands::help::HELP_SUMMARY, commands::help::HELP_USAGE);
        registry.insert("quit", commands::help::quit, commands::help::QUIT_SUMMARY, commands::help::QUIT_USAGE);
        registry
    }

    /// Installs a command.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `name` is empty, contains whitespace,
    /// starts with the sentinel, is reserved, or is already installed.
    pub fn install(
        &mut self,
        name: &str,
        handler: Handler,
        summary: &str,
        usage: &[&str],
    ) -> Result<()> {
        if name.is_empty() || name.starts_with(SENTINEL) || name.chars().any(char::is_whitespace) {
            return Err(Error::config(format!("invalid command name {name:?}")));
        }
        if RESERVED.contains(&name) {
            return Err(Error::config(format!("command name {name:?} is reserved")));
        }
        if self.commands.contains_key(name) {
            return Err(Error::config(format!("command {name:?} is already installed")));
        }
        self.insert(name, handler, summary, usage);
        Ok(())
    }

    fn insert(&mut self, name: &str, handler: Handler, summary: &str, usage: &[&str]) {
        self.commands.insert(
            name.to_string(),
            CommandDescriptor {
                name: name.to_string(),
                handler,
                summary: summary.to_string(),
                usage: usage.iter().map(ToString::to_string).collect(),
            },
        );
    }

    /// Looks up a command by exact, case-sensitive name.
    ///
    /// # Errors
    ///
    /// Returns a lookup error naming the command as typed, sentinel included.
    pub fn resolve(&self, name: &str) -> Result<&CommandDescriptor> {
        self.commands
            .get(name)
            .ok_or_else(|| Error::no_such_command(format!("{SENTINEL}{name}")))
    }

    /// Returns true if `name` is installed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Installed names in lexicographic order.
    #[must_use]
    pub fn list_names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Installed commands in name order.
    pub fn descriptors(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.values()
    }

    /// Number of installed commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Always false: the built-ins are installed from the start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Splits a meta-command line into its name and the remainder.
///
/// Returns `None` for lines that do not start with the sentinel. The
/// remainder has surrounding whitespace trimmed.
#[must_use]
pub fn split_command(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix(SENTINEL)?;
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    Some((&rest[..end], rest[end..].trim()))
}
