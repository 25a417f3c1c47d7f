//! CLI definitions using clap.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use gleam_plugin::core::options::LogSpec;
use gleam_plugin::{LogLevel, PluginOptions};

/// gleam-plugin - drive the Gleam bundler plugin hooks from a terminal
#[derive(Parser)]
#[command(name = "gleam-plugin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub plugin: PluginArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Plugin options; flags override values from `--options`.
#[derive(Args)]
pub struct PluginArgs {
    /// JSON file with plugin options
    #[arg(long, global = true)]
    pub options: Option<PathBuf>,

    /// Gleam project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Gleam compiler binary
    #[arg(long, global = true, env = "GLEAM_BIN")]
    pub bin: Option<PathBuf>,

    /// Log level: none, info, debug or trace
    #[arg(long, global = true)]
    pub log: Option<LogLevel>,

    /// Prefix log lines with a timestamp
    #[arg(long, global = true)]
    pub time: bool,

    /// Treat compiler warnings as errors
    #[arg(long, global = true)]
    pub warnings_as_errors: bool,

    /// Let the compiler print its progress
    #[arg(long, global = true)]
    pub print_progress: bool,

    /// Compiler time budget in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

impl PluginArgs {
    /// Merge the options file (if any) with command-line overrides.
    pub fn to_options(&self) -> Result<PluginOptions> {
        let mut options = match self.options {
            Some(ref path) => PluginOptions::from_path(path)?,
            None => PluginOptions::default(),
        };

        if self.cwd.is_some() {
            options.cwd = self.cwd.clone();
        }
        if self.bin.is_some() {
            options.bin = self.bin.clone();
        }
        if let Some(level) = self.log {
            options.log = Some(LogSpec::Level(level));
        }
        if self.time {
            options.time = Some(true);
        }
        if self.warnings_as_errors {
            options.warnings_as_errors = Some(true);
        }
        if self.print_progress {
            options.no_print_progress = Some(false);
        }
        if self.timeout_ms.is_some() {
            options.timeout_ms = self.timeout_ms;
        }

        Ok(options)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load gleam.toml and compile the project (build-start hook)
    Build,

    /// Resolve an import to its compiled file
    Resolve(ResolveArgs),

    /// Print the compiled counterpart of a Gleam source file
    Transform(TransformArgs),

    /// Print the project manifest as JSON
    Manifest,

    /// Add the build directory to a host config's watch exclusions
    Exclude(ExcludeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Import specifier, e.g. `./helper.mjs` or `hex:gleam/io`
    pub specifier: String,

    /// File containing the import
    #[arg(long)]
    pub importer: Option<PathBuf>,
}

#[derive(Args)]
pub struct TransformArgs {
    /// Gleam source file
    pub file: PathBuf,

    /// Print the source map instead of the code
    #[arg(long)]
    pub map: bool,
}

#[derive(Args)]
pub struct ExcludeArgs {
    /// Host config JSON file (reads stdin when omitted)
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
