//! Shell configuration.
//!
//! Loaded from a TOML file. Every field has a default, so an empty or missing
//! file yields [`ShellConfig::default`].
//!
//! ```toml
//! banner = false
//! history_file = "/home/me/.bqlsh_history"
//! history_size = 5000
//! trace_sql = true
//! log_level = "debug"
//! ```

use std::path::{Path, PathBuf};

use bqlsh_foundation::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::history;

/// Default number of history entries kept.
pub const DEFAULT_HISTORY_SIZE: usize = 1000;

/// Runtime configuration for the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Print the welcome banner on startup.
    pub banner: bool,
    /// Where line history persists. `None` keeps history in memory only.
    pub history_file: Option<PathBuf>,
    /// Maximum number of history entries.
    pub history_size: usize,
    /// Start with BQL tracing on.
    pub trace_bql: bool,
    /// Start with SQL tracing on.
    pub trace_sql: bool,
    /// Log filter directive used when `RUST_LOG` is unset.
    pub log_level: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            banner: true,
            history_file: history::default_history_path(),
            history_size: DEFAULT_HISTORY_SIZE,
            trace_bql: false,
            trace_sql: false,
            log_level: None,
        }
    }
}

impl ShellConfig {
    /// The default config file location: `<config dir>/bqlsh/config.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bqlsh")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file, or the defaults if it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {e}", path.display())))?;
        Self::parse_toml(&content, path)
    }

    /// Parses configuration from TOML text. `path` is only used in messages.
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem.
    pub fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config(format!("invalid config in {}:\n  {e}", path.display())))
    }

    /// Applies a history-location override. `Some("")` disables persistence.
    #[must_use]
    pub fn with_history_override(mut self, value: Option<&str>) -> Self {
        match value {
            Some("") => self.history_file = None,
            Some(path) => self.history_file = Some(PathBuf::from(path)),
            None => {}
        }
        self
    }

    /// Sets whether the banner is printed.
    #[must_use]
    pub const fn with_banner(mut self, banner: bool) -> Self {
        self.banner = banner;
        self
    }

    /// Sets the history file.
    #[must_use]
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Sets the history size.
    #[must_use]
    pub const fn with_history_size(mut self, size: usize) -> Self {
        self.history_size = size;
        self
    }

    /// Sets initial BQL tracing.
    #[must_use]
    pub const fn with_trace_bql(mut self, on: bool) -> Self {
        self.trace_bql = on;
        self
    }

    /// Sets initial SQL tracing.
    #[must_use]
    pub const fn with_trace_sql(mut self, on: bool) -> Self {
        self.trace_sql = on;
        self
    }

    /// Sets the fallback log filter.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }
}
