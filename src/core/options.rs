//! Plugin options accepted from the embedding caller.
//!
//! The schema is closed: unknown fields and unknown log levels are rejected
//! at the boundary instead of being probed for later.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PluginError;

/// Default compiler binary, looked up in PATH.
pub const DEFAULT_BIN: &str = "gleam";

/// Default compiler time budget in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only compiler command lines
    #[default]
    None,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(LogLevel::None),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "unknown log level `{}` (expected one of: info, debug, trace, none)",
                other
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::None => write!(f, "none"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Logging options after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogOptions {
    pub level: LogLevel,
    /// Prefix log lines with a timestamp
    pub time: bool,
}

/// The `log` option: either a bare level or a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogSpec {
    Level(LogLevel),
    Table {
        #[serde(default)]
        level: LogLevel,
        #[serde(default)]
        time: bool,
    },
}

/// Options recognized by the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginOptions {
    /// Path or name of the `gleam` binary
    pub bin: Option<PathBuf>,

    /// Gleam project root (directory containing gleam.toml)
    pub cwd: Option<PathBuf>,

    pub log: Option<LogSpec>,

    /// Prefix log lines with a timestamp (also settable via `log.time`)
    pub time: Option<bool>,

    /// Pass `--warnings-as-errors` to the compiler
    pub warnings_as_errors: Option<bool>,

    /// Pass `--no-print-progress` to the compiler (default: true)
    pub no_print_progress: Option<bool>,

    /// Compiler time budget in milliseconds (default: 5000)
    pub timeout_ms: Option<u64>,
}

impl PluginOptions {
    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, PluginError> {
        let options: PluginOptions =
            serde_json::from_str(json).map_err(|e| PluginError::InvalidOptions {
                message: e.to_string(),
            })?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, PluginError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PluginError::io(format!("failed to read options: {}", path.display()), e)
        })?;
        Self::from_json(&contents)
    }

    fn validate(&self) -> Result<(), PluginError> {
        if matches!(self.bin.as_deref(), Some(bin) if bin.as_os_str().is_empty()) {
            return Err(PluginError::InvalidOptions {
                message: "`bin` must not be empty".to_string(),
            });
        }
        if self.timeout_ms == Some(0) {
            return Err(PluginError::InvalidOptions {
                message: "`timeoutMs` must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn bin(&self) -> PathBuf {
        self.bin
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BIN))
    }

    /// Normalized logging options; a top-level `time` wins over `log.time`.
    pub fn log_options(&self) -> LogOptions {
        let (level, table_time) = match self.log {
            Some(LogSpec::Level(level)) => (level, false),
            Some(LogSpec::Table { level, time }) => (level, time),
            None => (LogLevel::None, false),
        };
        LogOptions {
            level,
            time: self.time.unwrap_or(table_time),
        }
    }

    pub fn warnings_as_errors(&self) -> bool {
        self.warnings_as_errors.unwrap_or(false)
    }

    pub fn no_print_progress(&self) -> bool {
        self.no_print_progress.unwrap_or(true)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }
}
