//! `gleam-plugin resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use gleam_plugin::ops::resolve::HEX_PREFIX;
use gleam_plugin::{GleamPlugin, PluginOptions, Project, Resolution};

pub fn execute(options: &PluginOptions, args: ResolveArgs) -> Result<()> {
    let mut project = Project::new(options)?;

    // `hex:` imports map straight into the output root
    if !args.specifier.starts_with(HEX_PREFIX) {
        project.reload_manifest()?;
    }

    let plugin = GleamPlugin::with_project(project);
    let importer = args
        .importer
        .as_deref()
        .map(|p| plugin.project().cwd().join(p));

    match plugin.resolve_id(&args.specifier, importer.as_deref())? {
        Resolution::Resolved(path) => println!("{}", path.display()),
        Resolution::Defer => eprintln!("note: no importer, resolution left to the host"),
        Resolution::NotApplicable => eprintln!("note: `{}` is not a Gleam import", args.specifier),
    }

    Ok(())
}
