//! Test utilities for gleam-plugin unit tests.
//!
//! Provides on-disk Gleam project fixtures and a scripted stand-in for the
//! `gleam` binary, so hooks can be exercised without a real compiler.
//!
//! # Example
//!
//! ```rust,ignore
//! use gleam_plugin::test_support::{fake_gleam, GleamProjectFixture};
//!
//! #[test]
//! fn test_example() {
//!     let project = GleamProjectFixture::new("app")
//!         .with_source("main.gleam", "pub fn main() { Nil }")
//!         .create();
//!     let bin = fake_gleam(project.path(), "exit 0");
//!     // Point a Project at project.path() using `bin`...
//! }
//! ```

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};

pub use fixtures::*;

/// File name of the fake compiler written by [`fake_gleam`].
pub const FAKE_GLEAM: &str = "fake-gleam";

/// Write an executable `sh` script standing in for `gleam` into `dir`.
///
/// The script runs in the project root with the compiler arguments as
/// `$@`; `body` decides what it prints, writes and exits with.
#[cfg(unix)]
pub fn fake_gleam(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(FAKE_GLEAM);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project::ProjectDirs;

    #[test]
    fn test_fixture_layout() {
        let project = GleamProjectFixture::new("app")
            .with_source("main.gleam", "pub fn main() { Nil }")
            .with_compiled("app/main.mjs", "export function main() {}")
            .create();
        let dirs = ProjectDirs::new(project.path().to_path_buf());

        assert!(project.path().join("gleam.toml").is_file());
        assert!(dirs.src.join("main.gleam").is_file());
        assert!(dirs.out.join("app/main.mjs").is_file());
    }

    #[test]
    fn test_fixture_without_manifest() {
        let project = GleamProjectFixture::new("app").without_manifest().create();
        assert!(!project.path().join("gleam.toml").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_fake_gleam_is_executable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bin = fake_gleam(tmp.path(), "exit 0");
        let status = std::process::Command::new(&bin).status().unwrap();
        assert!(status.success());
    }
}
