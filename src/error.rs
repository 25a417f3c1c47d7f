//! Error types for the plugin hooks.

use std::fmt;
use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error returned by any plugin hook or component.
#[derive(Debug, Error, Diagnostic)]
pub enum PluginError {
    #[error("gleam manifest not found: {}", path.display())]
    #[diagnostic(
        code(gleam_plugin::config::not_found),
        help("Run the bundler from a Gleam project root or set the `cwd` option")
    )]
    ConfigNotFound { path: PathBuf },

    #[error("gleam manifest is not a file: {}", path.display())]
    #[diagnostic(code(gleam_plugin::config::not_a_file))]
    ConfigNotAFile { path: PathBuf },

    #[error("failed to parse gleam manifest {}: {message}", path.display())]
    #[diagnostic(code(gleam_plugin::config::parse))]
    ConfigParseError { path: PathBuf, message: String },

    #[error("gleam manifest not loaded; expected {}", path.display())]
    #[diagnostic(
        code(gleam_plugin::config::not_loaded),
        help("The manifest is read when the build starts")
    )]
    ManifestNotLoaded { path: PathBuf },

    #[error("empty module specifier `{specifier}`")]
    #[diagnostic(
        code(gleam_plugin::resolve::empty_module),
        help("Name a module after the prefix, e.g. `hex:gleam/io`")
    )]
    EmptyModuleSpecifier { specifier: String },

    #[error("compiled output missing: {}", path.display())]
    #[diagnostic(
        code(gleam_plugin::transform::output_missing),
        help("The compiler has not produced this module yet; check the build output")
    )]
    CompiledOutputMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(gleam_plugin::build::failed))]
    CompilerInvocationFailed(#[from] CompilerError),

    #[error("invalid plugin options: {message}")]
    #[diagnostic(code(gleam_plugin::options::invalid))]
    InvalidOptions { message: String },

    #[error("{context}")]
    #[diagnostic(code(gleam_plugin::io))]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl PluginError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        PluginError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Why a compiler invocation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The process exited with a non-zero status (`None` when killed by a signal).
    Exit(Option<i32>),
    /// The process exceeded its time budget and was killed.
    TimedOut { timeout_ms: u128 },
    /// The process could not be started.
    Spawn(String),
    /// The build job stopped without producing an outcome.
    Aborted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Exit(Some(code)) => write!(f, "exited with status {}", code),
            FailureReason::Exit(None) => write!(f, "terminated by signal"),
            FailureReason::TimedOut { timeout_ms } => {
                write!(f, "timed out after {}ms", timeout_ms)
            }
            FailureReason::Spawn(message) => write!(f, "could not be started: {}", message),
            FailureReason::Aborted => write!(f, "was aborted before finishing"),
        }
    }
}

/// A failed `gleam build` invocation, with the captured streams.
///
/// Cloneable so that callers coalesced onto the same queued build all
/// receive the failure.
#[derive(Debug, Clone, Error)]
#[error("`{command}` {reason}\n{stdout}{stderr}")]
pub struct CompilerError {
    pub command: String,
    pub reason: FailureReason,
    pub stdout: String,
    pub stderr: String,
}

impl CompilerError {
    /// Check if the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.reason, FailureReason::TimedOut { .. })
    }
}
