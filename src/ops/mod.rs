//! Plugin operations.
//!
//! Each operation works over an explicitly passed [`Project`](crate::Project).

pub mod build_queue;
pub mod gleam_build;
pub mod resolve;
pub mod transform;

pub use build_queue::BuildQueue;
pub use gleam_build::{build, build_args, BuildResult};
pub use resolve::{is_gleam_file, resolve, Resolution};
pub use transform::{transform, SourceMap, Transformed};
