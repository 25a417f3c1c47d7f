//! Command implementations

pub mod build;
pub mod completions;
pub mod exclude;
pub mod manifest;
pub mod resolve;
pub mod transform;
