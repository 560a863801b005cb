//! Interactive shell, meta-commands, configuration, and CLI for bqlsh.
//!
//! This crate provides:
//! - [`Repl`] - The read loop over a [`LineEditor`]
//! - [`Session`] - Per-line dispatch: meta-commands, statement accumulation,
//!   and execution
//! - [`CommandRegistry`] - The name → handler table behind `.help` and friends
//! - [`ShellConfig`] - TOML configuration and logging setup

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod accumulator;
pub mod adapter;
pub mod commands;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod history;
pub mod logging;
pub mod output;
pub mod registry;
pub mod repl;
pub mod session;

pub use accumulator::{Accumulator, Append, Language, Statement};
pub use adapter::{Adapter, TraceFlags};
pub use config::ShellConfig;
pub use editor::{LineEditor, ReadResult, RustylineEditor, StdinEditor};
pub use output::{Captured, Output};
pub use registry::{CommandDescriptor, CommandRegistry, Control, Handler, SENTINEL};
pub use repl::{BANNER, Repl};
pub use session::{FAREWELL, Session};
