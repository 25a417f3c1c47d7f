//! gleam-plugin - bundler plugin for Gleam projects
//!
//! This crate lets a JavaScript bundler import `.gleam` files as modules.
//! It runs `gleam build --target javascript`, resolves imports to the
//! generated `.mjs` files under `build/dev/javascript`, and substitutes the
//! compiled output when the bundler transforms a Gleam source file.

pub mod core;
pub mod error;
pub mod ops;
pub mod plugin;
pub mod util;

/// Test utilities for gleam-plugin unit tests.
///
/// Provides throwaway Gleam project layouts and a fake `gleam` executable.
#[cfg(test)]
pub mod test_support;

pub use core::{
    manifest::Manifest,
    options::{LogLevel, LogOptions, PluginOptions},
    project::Project,
};

pub use error::{CompilerError, PluginError};
pub use ops::{
    gleam_build::BuildResult, resolve::Resolution, transform::SourceMap, transform::Transformed,
};
pub use plugin::{GleamPlugin, HmrContext, HostConfig, HotUpdate, PluginState};

/// Name reported by the plugin to the host and used as the log prefix.
pub const PLUGIN_NAME: &str = "gleam-plugin";

/// Result alias used throughout the library.
pub type Result<T, E = PluginError> = std::result::Result<T, E>;
