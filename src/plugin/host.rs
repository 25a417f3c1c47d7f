//! Host bundler types seen by the hooks.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Glob excluding the compiler's build tree from the host watcher.
pub const BUILD_EXCLUDE_GLOB: &str = "build/**";

/// The part of the host configuration the plugin reads and mutates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<HostBuildOptions>,
}

/// `build` section of the host configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostBuildOptions {
    /// Watch mode; `None` means the host is not watching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch: Option<WatchOptions>,
}

/// `build.watch` section of the host configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<WatchExclude>,
}

/// Watch exclusions: a single glob or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WatchExclude {
    One(String),
    Many(Vec<String>),
}

impl WatchExclude {
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            WatchExclude::One(p) => vec![p.as_str()],
            WatchExclude::Many(ps) => ps.iter().map(String::as_str).collect(),
        }
    }
}

impl HostConfig {
    /// Add `pattern` to the watch exclusions, keeping any existing entries
    /// in order. Returns false when the host has no watch section.
    pub fn exclude_from_watch(&mut self, pattern: &str) -> bool {
        let Some(watch) = self.build.as_mut().and_then(|b| b.watch.as_mut()) else {
            return false;
        };

        let mut patterns = match watch.exclude.take() {
            None => Vec::new(),
            Some(WatchExclude::One(p)) => vec![p],
            Some(WatchExclude::Many(ps)) => ps,
        };
        if !patterns.iter().any(|p| p == pattern) {
            patterns.push(pattern.to_string());
        }
        watch.exclude = Some(WatchExclude::Many(patterns));
        true
    }

    /// Parse a host configuration from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Context passed to the hot-update hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmrContext {
    /// Absolute path of the changed file
    pub file: PathBuf,
}

impl HmrContext {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        HmrContext { file: file.into() }
    }
}
