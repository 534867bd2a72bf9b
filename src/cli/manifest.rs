//! `folio manifest`: write the content manifest used by discovery.

use anyhow::Result;

use crate::config::FolioConfig;
use crate::content::manifest::{scan_content_files, write_manifest};
use crate::log;

pub fn run_manifest(config: &FolioConfig) -> Result<usize> {
    let options = config.content.discovery_options();
    let manifest = scan_content_files(config.project_root(), &options.content_dir, &options.folders);
    let path = config.manifest_path();
    write_manifest(&manifest, &path)?;

    log!("manifest"; "{} files -> {}", manifest.files.len(), path.display());
    Ok(manifest.files.len())
}
