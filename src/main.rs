//! Folio command-line entry point.

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use folio::cli::{self, Cli, Commands};
use folio::config::FolioConfig;
use folio::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // `render` works on a single file and needs no project.
    if let Commands::Render { args } = &cli.command {
        return cli::render::run_render(args);
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = FolioConfig::load(cli.config.as_deref(), &cwd)?;

    match &cli.command {
        Commands::Build { args } => cli::build::build_site(args, &config).map(|_| ()),
        Commands::Query { args } => cli::query::run_query(args, &config),
        Commands::Manifest => cli::manifest::run_manifest(&config).map(|_| ()),
        Commands::Render { args } => cli::render::run_render(args),
    }
}
