//! Gleam project state shared by every hook.
//!
//! A [`Project`] is constructed once per bundler process and passed
//! explicitly to the build, resolve and transform operations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::manifest::{load_manifest, manifest_path, Manifest};
use crate::core::options::PluginOptions;
use crate::error::PluginError;
use crate::util::Logger;

/// Gleam source directory, relative to the project root.
pub const SRC_DIR: &str = "src";

/// Compiler output root for the JavaScript target, relative to the project
/// root. The layout is the compiler's own and cannot be relocated.
pub const BUILD_DIR: [&str; 3] = ["build", "dev", "javascript"];

/// Project directories, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDirs {
    /// Project root (contains gleam.toml)
    pub cwd: PathBuf,
    /// `<cwd>/src`
    pub src: PathBuf,
    /// `<cwd>/build/dev/javascript`
    pub out: PathBuf,
}

impl ProjectDirs {
    pub fn new(cwd: PathBuf) -> Self {
        let src = cwd.join(SRC_DIR);
        let out = BUILD_DIR.iter().fold(cwd.clone(), |p, seg| p.join(seg));
        ProjectDirs { cwd, src, out }
    }
}

/// Flags passed to `gleam build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildFlags {
    pub no_print_progress: bool,
    pub warnings_as_errors: bool,
    /// Kill the compiler after this long
    pub timeout: Duration,
}

impl Default for BuildFlags {
    fn default() -> Self {
        BuildFlags {
            no_print_progress: true,
            warnings_as_errors: false,
            timeout: Duration::from_millis(crate::core::options::DEFAULT_TIMEOUT_MS),
        }
    }
}

/// A Gleam project as seen by the plugin.
#[derive(Debug, Clone)]
pub struct Project {
    bin: PathBuf,
    dirs: ProjectDirs,
    log: Logger,
    build: BuildFlags,
    /// `None` until the first successful manifest load
    manifest: Option<Manifest>,
}

impl Project {
    /// Create project state from plugin options.
    ///
    /// A relative `cwd` is resolved against the process working directory.
    pub fn new(options: &PluginOptions) -> Result<Self, PluginError> {
        let process_cwd = std::env::current_dir()
            .map_err(|e| PluginError::io("failed to get current directory", e))?;
        let cwd = match options.cwd {
            Some(ref dir) => process_cwd.join(dir),
            None => process_cwd,
        };

        let log = Logger::from_options(options.log_options());
        let project = Project {
            bin: options.bin(),
            dirs: ProjectDirs::new(cwd),
            log,
            build: BuildFlags {
                no_print_progress: options.no_print_progress(),
                warnings_as_errors: options.warnings_as_errors(),
                timeout: options.timeout(),
            },
            manifest: None,
        };

        log.command(format!("STARTUP OK {} !", env!("CARGO_PKG_VERSION")));
        log.detail(format_args!("bin: '{}'", project.bin.display()));
        log.detail(format_args!("cwd: '{}'", project.dirs.cwd.display()));
        log.detail(format_args!("log.level: '{}'", log.level()));
        log.detail(format_args!("log.time: {}", log.time()));

        Ok(project)
    }

    /// Create project state rooted at `cwd` with default settings.
    pub fn at(cwd: impl Into<PathBuf>) -> Self {
        Project {
            bin: PathBuf::from(crate::core::options::DEFAULT_BIN),
            dirs: ProjectDirs::new(cwd.into()),
            log: Logger::default(),
            build: BuildFlags::default(),
            manifest: None,
        }
    }

    /// Use a different compiler binary.
    pub fn with_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.bin = bin.into();
        self
    }

    /// Use different build flags.
    pub fn with_build_flags(mut self, build: BuildFlags) -> Self {
        self.build = build;
        self
    }

    /// Install an already-loaded manifest.
    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Re-read gleam.toml, replacing any previously loaded manifest.
    ///
    /// On failure the previous manifest is kept and the error is logged.
    pub fn reload_manifest(&mut self) -> Result<&Manifest, PluginError> {
        let manifest = load_manifest(&self.dirs.cwd).inspect_err(|e| self.log.error(e))?;

        self.log.info("[config-gleam] ok!");
        self.log
            .detail(format_args!("[config-gleam] name: '{}'", manifest.name));
        self.log
            .detail(format_args!("[config-gleam] version: {}", manifest.version));
        self.log.detail(format_args!(
            "[config-gleam] typescript_declarations: {}",
            manifest.javascript.typescript_declarations
        ));

        Ok(self.manifest.insert(manifest))
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    pub fn dirs(&self) -> &ProjectDirs {
        &self.dirs
    }

    pub fn cwd(&self) -> &Path {
        &self.dirs.cwd
    }

    pub fn out_dir(&self) -> &Path {
        &self.dirs.out
    }

    pub fn log(&self) -> &Logger {
        &self.log
    }

    pub fn build_flags(&self) -> &BuildFlags {
        &self.build
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    /// The loaded manifest, or `ManifestNotLoaded`.
    pub fn require_manifest(&self) -> Result<&Manifest, PluginError> {
        self.manifest.as_ref().ok_or_else(|| {
            let err = PluginError::ManifestNotLoaded {
                path: manifest_path(&self.dirs.cwd),
            };
            self.log.error(&err);
            err
        })
    }
}
