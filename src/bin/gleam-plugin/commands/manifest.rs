//! `gleam-plugin manifest` command

use anyhow::{Context, Result};

use gleam_plugin::{PluginOptions, Project};

pub fn execute(options: &PluginOptions) -> Result<()> {
    let mut project = Project::new(options)?;
    let manifest = project.reload_manifest()?;

    let json = serde_json::to_string_pretty(manifest).context("failed to serialize manifest")?;
    println!("{}", json);

    Ok(())
}
