//! CLI module for folio.
//!
//! Subcommands:
//! - `build`: discover and hydrate documents into HTML fragments
//! - `query`: list documents through the portfolio filters
//! - `render`: draw one chart or diagram source as SVG
//! - `manifest`: write the content manifest

mod args;
pub mod build;
pub mod manifest;
pub mod query;
pub mod render;

pub use args::{BuildArgs, Cli, Commands, QueryArgs, RenderArgs};

use crate::config::FolioConfig;
use crate::content::{Discovery, DiscoveryOptions, FsSource, discover};

/// Filesystem source and discovery options for the configured project.
pub(crate) fn open_source(config: &FolioConfig) -> (FsSource, DiscoveryOptions) {
    let options = config.content.discovery_options();
    let source = FsSource::new(
        config.project_root(),
        &options.content_dir,
        &config.content.manifest,
    );
    (source, options)
}

/// Run discovery against the configured project.
pub(crate) fn discover_project(config: &FolioConfig) -> (FsSource, Discovery) {
    let (source, options) = open_source(config);
    let discovery = discover(&source, &options);
    (source, discovery)
}
