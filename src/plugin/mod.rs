//! Bundler hook surface.
//!
//! [`GleamPlugin`] owns the project state for the lifetime of the bundler
//! process and exposes the five hooks a host calls:
//!
//! | hook                   | state change                         |
//! |------------------------|--------------------------------------|
//! | [`config`]             | `Uninitialized -> Configured`        |
//! | [`build_start`]        | `* -> Built` (reload manifest, build) |
//! | [`handle_hot_update`]  | `Built -> HotUpdating -> Built`      |
//!
//! Hot updates arriving before the first successful build are ignored.
//! `HotUpdating` lasts until the last overlapping hot update has finished.
//! | [`resolve_id`]         | none                                 |
//! | [`transform`]          | none                                 |
//!
//! [`config`]: GleamPlugin::config
//! [`build_start`]: GleamPlugin::build_start
//! [`handle_hot_update`]: GleamPlugin::handle_hot_update
//! [`resolve_id`]: GleamPlugin::resolve_id
//! [`transform`]: GleamPlugin::transform

pub mod host;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub use host::{HmrContext, HostBuildOptions, HostConfig, WatchExclude, WatchOptions};

use crate::core::{PluginOptions, Project};
use crate::error::PluginError;
use crate::ops::{self, BuildQueue, BuildResult, Resolution, Transformed};
use crate::PLUGIN_NAME;

/// Lifecycle state of the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    Uninitialized,
    Configured,
    Built,
    HotUpdating,
}

/// Outcome of the hot-update hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotUpdate {
    /// A Gleam file changed and the project was rebuilt.
    Rebuilt(BuildResult),
    /// Not a Gleam file; left to the host.
    Ignored,
}

/// Lifecycle state plus the number of hot updates in flight.
#[derive(Debug)]
struct Lifecycle {
    state: PluginState,
    hot_updates: usize,
}

/// The Gleam bundler plugin.
#[derive(Debug)]
pub struct GleamPlugin {
    project: Project,
    lifecycle: Mutex<Lifecycle>,
    queue: BuildQueue,
}

impl GleamPlugin {
    /// Create the plugin from caller options.
    pub fn new(options: &PluginOptions) -> Result<Self, PluginError> {
        Ok(Self::with_project(Project::new(options)?))
    }

    /// Create the plugin around existing project state.
    pub fn with_project(project: Project) -> Self {
        let queue = BuildQueue::with_logger(*project.log());
        GleamPlugin {
            project,
            lifecycle: Mutex::new(Lifecycle {
                state: PluginState::Uninitialized,
                hot_updates: 0,
            }),
            queue,
        }
    }

    /// Plugin name reported to the host.
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn state(&self) -> PluginState {
        self.lock_lifecycle().state
    }

    /// Config hook: keep the host watcher out of the compiler's build tree.
    ///
    /// Returns true when the host configuration was changed.
    pub fn config(&mut self, config: &mut HostConfig) -> bool {
        self.set_state(PluginState::Configured);

        let changed = config.exclude_from_watch(host::BUILD_EXCLUDE_GLOB);
        if changed {
            self.project.log().info(format_args!(
                "[config-vite] watch exclude '{}'",
                host::BUILD_EXCLUDE_GLOB
            ));
        }
        changed
    }

    /// Resolve hook.
    pub fn resolve_id(
        &self,
        specifier: &str,
        importer: Option<&Path>,
    ) -> Result<Resolution, PluginError> {
        ops::resolve(&self.project, specifier, importer)
    }

    /// Transform hook.
    ///
    /// Before the first build the compiled file may not exist yet, which
    /// surfaces as `CompiledOutputMissing`.
    pub fn transform(&self, code: &str, id: &Path) -> Result<Transformed, PluginError> {
        ops::transform(&self.project, id, code)
    }

    /// Build-start hook: reload gleam.toml, then compile.
    ///
    /// Resolve and transform depend on both, so the host must wait for this
    /// to return before issuing them.
    pub fn build_start(&mut self) -> Result<BuildResult, PluginError> {
        self.project.reload_manifest()?;

        let project = &self.project;
        let result = self.queue.run(|| ops::build(project))?;

        self.set_state(PluginState::Built);
        self.project.log().info("[buildStart] ok!");
        Ok(result)
    }

    /// Hot-update hook: rebuild when a Gleam file changed.
    ///
    /// Only runs once `build_start` has succeeded. Concurrent calls are
    /// serialized through the build queue; the plugin returns to `Built`
    /// when the last of them finishes, whether or not its build failed.
    pub fn handle_hot_update(&self, ctx: &HmrContext) -> Result<HotUpdate, PluginError> {
        let log = self.project.log();

        if !ops::is_gleam_file(&ctx.file) {
            log.skip(format_args!("hot update of {}", ctx.file.display()));
            return Ok(HotUpdate::Ignored);
        }

        let Some(_update) = HotUpdateGuard::enter(self) else {
            log.skip(format_args!("hot update before first build {}", ctx.file.display()));
            return Ok(HotUpdate::Ignored);
        };

        let result = self.queue.run(|| ops::build(&self.project))?;

        log.info("[hotUpdate] ok!");
        log.detail(format_args!("[hotUpdate] file: {}", ctx.file.display()));
        Ok(HotUpdate::Rebuilt(result))
    }

    fn set_state(&self, state: PluginState) {
        self.lock_lifecycle().state = state;
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Holds the plugin in `HotUpdating` for the duration of one hot update.
struct HotUpdateGuard<'a> {
    plugin: &'a GleamPlugin,
}

impl<'a> HotUpdateGuard<'a> {
    /// Enter `HotUpdating`; `None` unless the plugin has been built.
    fn enter(plugin: &'a GleamPlugin) -> Option<Self> {
        let mut lifecycle = plugin.lock_lifecycle();
        match lifecycle.state {
            PluginState::Built | PluginState::HotUpdating => {
                lifecycle.state = PluginState::HotUpdating;
                lifecycle.hot_updates += 1;
                Some(HotUpdateGuard { plugin })
            }
            PluginState::Uninitialized | PluginState::Configured => None,
        }
    }
}

impl Drop for HotUpdateGuard<'_> {
    fn drop(&mut self) {
        let mut lifecycle = self.plugin.lock_lifecycle();
        lifecycle.hot_updates = lifecycle.hot_updates.saturating_sub(1);
        if lifecycle.hot_updates == 0 {
            lifecycle.state = PluginState::Built;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::GleamProjectFixture;

    #[test]
    fn test_new_plugin_is_uninitialized() {
        let plugin = GleamPlugin::with_project(Project::at("/proj"));
        assert_eq!(plugin.state(), PluginState::Uninitialized);
        assert_eq!(plugin.name(), "gleam-plugin");
    }

    #[test]
    fn test_config_hook() {
        let mut plugin = GleamPlugin::with_project(Project::at("/proj"));
        let mut config = HostConfig {
            build: Some(HostBuildOptions {
                watch: Some(WatchOptions::default()),
            }),
        };

        assert!(plugin.config(&mut config));
        assert_eq!(plugin.state(), PluginState::Configured);
        assert_eq!(
            config.build.unwrap().watch.unwrap().exclude,
            Some(WatchExclude::Many(vec!["build/**".to_string()]))
        );
    }

    #[test]
    fn test_build_start_without_manifest() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut plugin = GleamPlugin::with_project(Project::at(tmp.path()));

        let err = plugin.build_start().unwrap_err();
        assert!(matches!(err, PluginError::ConfigNotFound { .. }));
        assert_eq!(plugin.state(), PluginState::Uninitialized);
    }

    #[test]
    fn test_hot_update_ignores_other_files() {
        let plugin = GleamPlugin::with_project(Project::at("/proj"));
        let outcome = plugin
            .handle_hot_update(&HmrContext::new("/proj/web/style.css"))
            .unwrap();
        assert_eq!(outcome, HotUpdate::Ignored);
    }

    #[test]
    fn test_hot_update_before_build_is_ignored() {
        let mut plugin = GleamPlugin::with_project(Project::at("/proj"));
        let ctx = HmrContext::new("/proj/src/main.gleam");

        assert_eq!(plugin.handle_hot_update(&ctx).unwrap(), HotUpdate::Ignored);
        assert_eq!(plugin.state(), PluginState::Uninitialized);

        plugin.config(&mut HostConfig::default());
        assert_eq!(plugin.handle_hot_update(&ctx).unwrap(), HotUpdate::Ignored);
        assert_eq!(plugin.state(), PluginState::Configured);
        assert!(plugin.project().manifest().is_none());
    }

    #[test]
    fn test_hot_update_ignores_lookalike_prelude() {
        let plugin = GleamPlugin::with_project(Project::at("/proj"));
        plugin.set_state(PluginState::Built);

        let outcome = plugin
            .handle_hot_update(&HmrContext::new("/proj/web/my_gleam.mjs"))
            .unwrap();
        assert_eq!(outcome, HotUpdate::Ignored);
        assert_eq!(plugin.state(), PluginState::Built);
    }

    #[test]
    fn test_resolve_before_build_start() {
        let plugin = GleamPlugin::with_project(Project::at("/proj"));
        let err = plugin
            .resolve_id("./helper.mjs", Some(Path::new("/proj/src/main.gleam")))
            .unwrap_err();
        assert!(matches!(err, PluginError::ManifestNotLoaded { .. }));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use crate::test_support::fake_gleam;

        /// Fake compiler writing app/main.mjs stamped with the build count.
        const COMPILE_SCRIPT: &str = r#"
mkdir -p build/dev/javascript/app
echo "build" >> builds.log
printf 'export function main() { return %s; }\n' "$(wc -l < builds.log | tr -d ' ')" > build/dev/javascript/app/main.mjs
"#;

        #[test]
        fn test_full_lifecycle() {
            let fixture = GleamProjectFixture::new("app")
                .with_source("main.gleam", "pub fn main() { 1 }\n")
                .create();
            let bin = fake_gleam(fixture.path(), COMPILE_SCRIPT);
            let project = Project::at(fixture.path()).with_bin(&bin);
            let mut plugin = GleamPlugin::with_project(project);

            let mut config = HostConfig::default();
            assert!(!plugin.config(&mut config));
            assert_eq!(plugin.state(), PluginState::Configured);

            let main = fixture.path().join("src/main.gleam");
            let err = plugin.transform("pub fn main() { 1 }\n", &main).unwrap_err();
            assert!(matches!(err, PluginError::ManifestNotLoaded { .. }));

            plugin.build_start().unwrap();
            assert_eq!(plugin.state(), PluginState::Built);
            assert_eq!(plugin.project().manifest().unwrap().name, "app");

            let resolved = plugin
                .resolve_id("./main.mjs", Some(main.as_path()))
                .unwrap()
                .into_path()
                .unwrap();
            assert_eq!(resolved, plugin.project().out_dir().join("app/main.mjs"));

            let first = plugin.transform("pub fn main() { 1 }\n", &main).unwrap();
            assert_eq!(first.code(), Some("export function main() { return 1; }\n"));

            let outcome = plugin.handle_hot_update(&HmrContext::new(&main)).unwrap();
            assert!(matches!(outcome, HotUpdate::Rebuilt(_)));
            assert_eq!(plugin.state(), PluginState::Built);

            let second = plugin.transform("pub fn main() { 1 }\n", &main).unwrap();
            assert_eq!(second.code(), Some("export function main() { return 2; }\n"));
        }

        /// Fake compiler that fails once `broken` exists in the project root.
        const FLAKY_SCRIPT: &str = r#"
if [ -f broken ]; then
  echo 'error: Syntax error' >&2
  exit 1
fi
"#;

        /// Fake compiler whose n-th run (n > 1) waits for a `release<n>` file.
        const GATED_SCRIPT: &str = r#"
n=$(( $(cat runs 2>/dev/null || echo 0) + 1 ))
echo "$n" > runs
if [ "$n" -gt 1 ]; then
  while [ ! -f "release$n" ]; do sleep 0.02; done
fi
"#;

        fn wait_until(cond: impl Fn() -> bool) {
            for _ in 0..500 {
                if cond() {
                    return;
                }
                std::thread::sleep(std::time::Duration::from_millis(5));
            }
            panic!("condition not reached");
        }

        #[test]
        fn test_failed_hot_update_surfaces_error() {
            let fixture = GleamProjectFixture::new("app").create();
            let bin = fake_gleam(fixture.path(), FLAKY_SCRIPT);
            let mut plugin = GleamPlugin::with_project(Project::at(fixture.path()).with_bin(&bin));
            plugin.build_start().unwrap();

            std::fs::write(fixture.path().join("broken"), "").unwrap();
            let err = plugin
                .handle_hot_update(&HmrContext::new(fixture.path().join("src/main.gleam")))
                .unwrap_err();
            match err {
                PluginError::CompilerInvocationFailed(inner) => {
                    assert!(inner.stderr.contains("Syntax error"))
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert_eq!(plugin.state(), PluginState::Built);
        }

        #[test]
        fn test_overlapping_hot_updates_stay_hot_updating() {
            use std::sync::Arc;
            use std::thread;

            let fixture = GleamProjectFixture::new("app").create();
            let root = fixture.path().to_path_buf();
            let bin = fake_gleam(&root, GATED_SCRIPT);
            let mut plugin = GleamPlugin::with_project(Project::at(&root).with_bin(&bin));
            plugin.build_start().unwrap();
            let plugin = Arc::new(plugin);
            let main = root.join("src/main.gleam");

            let first = {
                let plugin = plugin.clone();
                let ctx = HmrContext::new(&main);
                thread::spawn(move || plugin.handle_hot_update(&ctx))
            };
            wait_until(|| plugin.queue.is_running());
            assert_eq!(plugin.state(), PluginState::HotUpdating);

            let second = {
                let plugin = plugin.clone();
                let ctx = HmrContext::new(&main);
                thread::spawn(move || plugin.handle_hot_update(&ctx))
            };
            wait_until(|| plugin.queue.is_pending());

            std::fs::write(root.join("release2"), "").unwrap();
            assert!(matches!(first.join().unwrap(), Ok(HotUpdate::Rebuilt(_))));
            assert_eq!(plugin.state(), PluginState::HotUpdating);

            std::fs::write(root.join("release3"), "").unwrap();
            assert!(matches!(second.join().unwrap(), Ok(HotUpdate::Rebuilt(_))));
            assert_eq!(plugin.state(), PluginState::Built);
        }
    }
}
