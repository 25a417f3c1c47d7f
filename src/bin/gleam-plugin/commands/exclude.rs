//! `gleam-plugin exclude` command

use std::io::Read;

use anyhow::{Context, Result};

use crate::cli::ExcludeArgs;
use gleam_plugin::{GleamPlugin, HostConfig, PluginOptions};

pub fn execute(options: &PluginOptions, args: ExcludeArgs) -> Result<()> {
    let json = match args.config {
        Some(ref path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read host config: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read host config from stdin")?;
            buf
        }
    };

    let mut config = HostConfig::from_json(&json).context("invalid host config")?;

    let mut plugin = GleamPlugin::new(options)?;
    if !plugin.config(&mut config) {
        eprintln!("note: host is not watching, config unchanged");
    }

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}
