//! Plugin logging.
//!
//! Messages fall into a few classes, each gated by the configured
//! [`LogLevel`] before being handed to `tracing`:
//!
//! - commands (`$ gleam build ...`) are always shown, even at `none`
//! - summaries are shown from `info` up
//! - details are shown from `debug` up
//! - skipped work is only reported at `trace`
//! - errors are shown at every level except `none`

use std::fmt::Display;

use tracing_subscriber::EnvFilter;

use crate::core::options::{LogLevel, LogOptions};
use crate::PLUGIN_NAME;

/// Class of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Command,
    Summary,
    Detail,
    Skip,
    Error,
}

/// Level-filtered logger shared by every plugin component.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    options: LogOptions,
}

impl Logger {
    pub fn new(level: LogLevel) -> Self {
        Logger {
            options: LogOptions { level, time: false },
        }
    }

    /// Logger for the given options, installing the plugin subscriber
    /// unless the process already has one.
    pub fn from_options(options: LogOptions) -> Self {
        init(&options);
        Logger { options }
    }

    pub fn level(&self) -> LogLevel {
        self.options.level
    }

    /// Whether log lines carry a timestamp.
    pub fn time(&self) -> bool {
        self.options.time
    }

    pub fn options(&self) -> LogOptions {
        self.options
    }

    /// Check whether a message of the given kind passes the level filter.
    pub fn enabled(&self, kind: LogKind) -> bool {
        match (self.options.level, kind) {
            (_, LogKind::Command) => true,
            (LogLevel::None, _) => false,
            (_, LogKind::Error) => true,
            (LogLevel::Trace, _) => true,
            (_, LogKind::Skip) => false,
            (LogLevel::Debug, _) => true,
            (LogLevel::Info, LogKind::Summary) => true,
            (LogLevel::Info, _) => false,
        }
    }

    pub fn command(&self, msg: impl Display) {
        if self.enabled(LogKind::Command) {
            tracing::info!(target: "gleam_plugin", "[{}] $ {}", PLUGIN_NAME, msg);
        }
    }

    pub fn info(&self, msg: impl Display) {
        if self.enabled(LogKind::Summary) {
            tracing::info!(target: "gleam_plugin", "[{}] {}", PLUGIN_NAME, msg);
        }
    }

    pub fn detail(&self, msg: impl Display) {
        if self.enabled(LogKind::Detail) {
            tracing::debug!(target: "gleam_plugin", "[{}][debug] {}", PLUGIN_NAME, msg);
        }
    }

    pub fn skip(&self, msg: impl Display) {
        if self.enabled(LogKind::Skip) {
            tracing::trace!(target: "gleam_plugin", "[{}] skip: {}", PLUGIN_NAME, msg);
        }
    }

    pub fn error(&self, msg: impl Display) {
        if self.enabled(LogKind::Error) {
            tracing::error!(target: "gleam_plugin", "[{}] ERROR | {}", PLUGIN_NAME, msg);
        }
    }
}

/// Install a `tracing` subscriber matching the plugin's log options.
///
/// `RUST_LOG` takes precedence over the configured level. Does nothing if
/// the embedding process already installed a global subscriber.
pub fn init(options: &LogOptions) {
    let directive = match options.level {
        // commands are still printed at `none`
        LogLevel::None | LogLevel::Info => "gleam_plugin=info",
        LogLevel::Debug => "gleam_plugin=debug",
        LogLevel::Trace => "gleam_plugin=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = if options.time {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
}
