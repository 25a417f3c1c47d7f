//! `gleam-plugin build` command

use anyhow::Result;

use gleam_plugin::{GleamPlugin, PluginOptions};

pub fn execute(options: &PluginOptions) -> Result<()> {
    let mut plugin = GleamPlugin::new(options)?;

    let result = plugin.build_start()?;

    let name = plugin
        .project()
        .manifest()
        .map(|m| format!("{} v{}", m.name, m.version))
        .unwrap_or_default();
    eprintln!("    Finished {} in {}ms", name, result.duration_ms());
    eprintln!("      Output {}", plugin.project().out_dir().display());

    Ok(())
}
