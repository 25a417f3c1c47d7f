//! Core data structures for Gleam projects.

pub mod manifest;
pub mod options;
pub mod project;

pub use manifest::Manifest;
pub use options::PluginOptions;
pub use project::Project;
