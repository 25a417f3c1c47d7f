//! Shared utilities

pub mod fs;
pub mod log;
pub mod process;

pub use log::Logger;
pub use process::ProcessBuilder;
