//! Test fixtures for Gleam project layouts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::manifest::MANIFEST_FILE;
use crate::core::project::ProjectDirs;

/// Fixture for a Gleam project on disk.
#[derive(Debug, Clone)]
pub struct GleamProjectFixture {
    /// gleam.toml content; `None` leaves the manifest out.
    pub manifest: Option<String>,
    /// Files under `src/` (relative path -> content).
    pub sources: BTreeMap<PathBuf, String>,
    /// Files under `build/dev/javascript/` (relative path -> content).
    pub compiled: BTreeMap<PathBuf, String>,
}

impl GleamProjectFixture {
    /// A JavaScript-target project called `name`.
    pub fn new(name: &str) -> Self {
        GleamProjectFixture {
            manifest: Some(format!(
                "name = \"{name}\"\nversion = \"1.0.0\"\ntarget = \"javascript\"\n\n[javascript]\ntypescript_declarations = false\n"
            )),
            sources: BTreeMap::new(),
            compiled: BTreeMap::new(),
        }
    }

    /// Drop the manifest from the fixture.
    pub fn without_manifest(mut self) -> Self {
        self.manifest = None;
        self
    }

    /// Add a source file under `src/`.
    pub fn with_source(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.sources.insert(path.into(), content.into());
        self
    }

    /// Add a compiled file under the output root.
    pub fn with_compiled(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.compiled.insert(path.into(), content.into());
        self
    }

    /// Write the fixture into a fresh temporary directory.
    pub fn create(&self) -> CreatedProject {
        let tmp = TempDir::new().unwrap();
        let dirs = ProjectDirs::new(tmp.path().to_path_buf());
        fs::create_dir_all(&dirs.src).unwrap();

        if let Some(ref manifest) = self.manifest {
            fs::write(tmp.path().join(MANIFEST_FILE), manifest).unwrap();
        }
        for (path, content) in &self.sources {
            write_file(&dirs.src.join(path), content);
        }
        for (path, content) in &self.compiled {
            write_file(&dirs.out.join(path), content);
        }

        CreatedProject { tmp }
    }
}

/// A fixture written to disk; removed on drop.
#[derive(Debug)]
pub struct CreatedProject {
    tmp: TempDir,
}

impl CreatedProject {
    pub fn path(&self) -> &Path {
        self.tmp.path()
    }

    /// Overwrite gleam.toml.
    pub fn write_manifest(&self, content: &str) {
        fs::write(self.path().join(MANIFEST_FILE), content).unwrap();
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
