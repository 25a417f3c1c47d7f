//! gleam.toml manifest parsing.
//!
//! Only the handful of keys the plugin needs are modelled; everything else
//! in the manifest (dependencies, repository, ...) is ignored.

use std::path::{Path, PathBuf};

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::PluginError;

/// Manifest file name at the project root.
pub const MANIFEST_FILE: &str = "gleam.toml";

/// The parsed gleam.toml manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Project name; names the compiled output directory
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Default compilation target
    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default)]
    pub javascript: JavaScriptOptions,
}

/// The `[javascript]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaScriptOptions {
    /// Emit `.d.mts` declaration files next to the generated modules
    #[serde(default)]
    pub typescript_declarations: bool,

    /// Runtime used by `gleam run` (node, deno, bun)
    #[serde(default)]
    pub runtime: Option<String>,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

fn default_target() -> String {
    "erlang".to_string()
}

impl Manifest {
    /// Parse manifest contents. `path` is only used for error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, PluginError> {
        toml::from_str(contents).map_err(|e| PluginError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Parse the version string as semver.
    pub fn semver(&self) -> Result<Version, semver::Error> {
        Version::parse(&self.version)
    }

    pub fn targets_javascript(&self) -> bool {
        self.target == "javascript"
    }
}

/// Path of the manifest for a project root.
pub fn manifest_path(cwd: &Path) -> PathBuf {
    cwd.join(MANIFEST_FILE)
}

/// Load `gleam.toml` from the project root.
pub fn load_manifest(cwd: &Path) -> Result<Manifest, PluginError> {
    let path = manifest_path(cwd);

    let meta = match std::fs::symlink_metadata(&path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PluginError::ConfigNotFound { path });
        }
        Err(e) => {
            return Err(PluginError::io(
                format!("failed to stat manifest: {}", path.display()),
                e,
            ));
        }
    };

    if !meta.is_file() {
        return Err(PluginError::ConfigNotAFile { path });
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        PluginError::io(format!("failed to read manifest: {}", path.display()), e)
    })?;

    Manifest::parse(&contents, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::GleamProjectFixture;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = Manifest::parse(
            r#"
name = "app"
version = "1.0.0"
target = "javascript"

[javascript]
typescript_declarations = true
runtime = "node"

[dependencies]
gleam_stdlib = ">= 0.34.0 and < 2.0.0"
"#,
            Path::new("gleam.toml"),
        )
        .unwrap();

        assert_eq!(manifest.name, "app");
        assert_eq!(manifest.semver().unwrap(), Version::new(1, 0, 0));
        assert!(manifest.targets_javascript());
        assert!(manifest.javascript.typescript_declarations);
        assert_eq!(manifest.javascript.runtime.as_deref(), Some("node"));
    }

    #[test]
    fn test_parse_defaults() {
        let manifest = Manifest::parse("name = \"app\"\n", Path::new("gleam.toml")).unwrap();
        assert_eq!(manifest.version, "0.0.0");
        assert_eq!(manifest.target, "erlang");
        assert!(!manifest.javascript.typescript_declarations);
    }

    #[test]
    fn test_parse_missing_name() {
        let err = Manifest::parse("version = \"1.0.0\"\n", Path::new("gleam.toml")).unwrap_err();
        assert!(matches!(err, PluginError::ConfigParseError { .. }));
    }

    #[test]
    fn test_load_manifest() {
        let project = GleamProjectFixture::new("app").create();
        let manifest = load_manifest(project.path()).unwrap();
        assert_eq!(manifest.name, "app");
    }

    #[test]
    fn test_load_missing_manifest() {
        let tmp = TempDir::new().unwrap();
        let err = load_manifest(tmp.path()).unwrap_err();
        assert!(matches!(err, PluginError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_manifest_directory() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(MANIFEST_FILE)).unwrap();

        let err = load_manifest(tmp.path()).unwrap_err();
        assert!(matches!(err, PluginError::ConfigNotAFile { .. }));
    }

    #[test]
    fn test_load_malformed_manifest() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MANIFEST_FILE), "name = \"app\nversion").unwrap();

        let err = load_manifest(tmp.path()).unwrap_err();
        assert!(matches!(err, PluginError::ConfigParseError { .. }));
    }
}
