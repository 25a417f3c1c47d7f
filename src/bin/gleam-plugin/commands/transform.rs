//! `gleam-plugin transform` command

use anyhow::{bail, Context, Result};

use crate::cli::TransformArgs;
use gleam_plugin::{GleamPlugin, PluginOptions, Project, Transformed};

pub fn execute(options: &PluginOptions, args: TransformArgs) -> Result<()> {
    let mut project = Project::new(options)?;
    project.reload_manifest()?;

    let file = project.cwd().join(&args.file);
    let original = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read file: {}", file.display()))?;

    let plugin = GleamPlugin::with_project(project);
    match plugin.transform(&original, &file)? {
        Transformed::Output { code, map } => {
            if args.map {
                println!("{}", map.to_json());
            } else {
                print!("{}", code);
            }
        }
        Transformed::NotApplicable => {
            bail!("`{}` is not a Gleam source file", args.file.display())
        }
    }

    Ok(())
}
