//! gleam-plugin CLI - run the Gleam bundler plugin hooks by hand

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();
    let options = cli.plugin.to_options()?;

    // Set up logging
    gleam_plugin::util::log::init(&options.log_options());

    // Execute command
    match cli.command {
        Commands::Build => commands::build::execute(&options),
        Commands::Resolve(args) => commands::resolve::execute(&options, args),
        Commands::Transform(args) => commands::transform::execute(&options, args),
        Commands::Manifest => commands::manifest::execute(&options),
        Commands::Exclude(args) => commands::exclude::execute(&options, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
