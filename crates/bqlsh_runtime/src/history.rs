//! History file location.
//!
//! History lives in `~/.bqlsh_history` unless `BQLSH_HISTORY` says otherwise;
//! an empty `BQLSH_HISTORY` disables persistence. rustyline does the file I/O.

use std::env;
use std::path::PathBuf;

/// File name of the default history file in the home directory.
pub const DEFAULT_HISTORY_FILE: &str = ".bqlsh_history";

/// Environment variable that overrides the history location.
pub const HISTORY_ENV_VAR: &str = "BQLSH_HISTORY";

/// The default history path, ignoring the environment.
#[must_use]
pub fn default_history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE))
}

/// The value of `BQLSH_HISTORY`, if set.
#[must_use]
pub fn history_override() -> Option<String> {
    env::var(HISTORY_ENV_VAR).ok()
}
