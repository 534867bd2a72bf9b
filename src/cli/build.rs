//! `folio build`: discover, parse, hydrate and write every document.
//!
//! Output layout:
//!
//! ```text
//! <output>/
//! ├── <id>.html      # hydrated body fragment per document
//! └── docs.json      # document metadata, intro first
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::cli::{BuildArgs, discover_project};
use crate::config::FolioConfig;
use crate::content::{Document, FsSource, load_document};
use crate::diagram::LayeredLayout;
use crate::hydrate::{HydrationReport, Hydrator};
use crate::logger::ProgressLine;
use crate::markdown::MediaKind;
use crate::{debug, log};

/// Index file written next to the fragments.
pub const INDEX_FILE: &str = "docs.json";

#[derive(Debug, Serialize)]
struct DocIndex<'a> {
    intro: Option<DocEntry<'a>>,
    docs: Vec<DocEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct DocEntry<'a> {
    #[serde(flatten)]
    doc: &'a Document,
    html: String,
    media: usize,
}

/// Totals for one build.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub docs: usize,
    pub charts: usize,
    pub diagrams: usize,
    pub fallbacks: usize,
}

/// Build the configured project into `args.output` (or `[build].output`).
pub fn build_site(args: &BuildArgs, config: &FolioConfig) -> Result<BuildSummary> {
    let output = args
        .output
        .as_ref()
        .map_or_else(|| config.output_dir(), |dir| config.project_root().join(dir));

    let (source, discovery) = discover_project(config);
    if discovery.is_empty() {
        log!("build"; "No content found in {}", config.content_dir().display());
        return Ok(BuildSummary::default());
    }

    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    let hydrator = hydrator_for(config);
    let all: Vec<&Document> = discovery.intro.iter().chain(&discovery.docs).collect();

    let (charts, diagrams) = all
        .iter()
        .filter_map(|doc| load_document(doc, &source))
        .flat_map(|parsed| parsed.figures())
        .fold((0, 0), |(charts, diagrams), figure| match figure.media.kind() {
            MediaKind::Chart if config.build.charts => (charts + 1, diagrams),
            MediaKind::Flow if config.build.diagrams => (charts, diagrams + 1),
            _ => (charts, diagrams),
        });

    let progress = ProgressLine::new(&[
        ("docs", all.len()),
        ("charts", charts),
        ("diagrams", diagrams),
    ]);

    let results: Vec<Result<(&Document, String, HydrationReport)>> = all
        .par_iter()
        .map(|doc| {
            let result = build_document(doc, &source, &hydrator, &output);
            if let Ok((_, report)) = &result {
                (0..report.charts).for_each(|_| progress.inc("charts"));
                (0..report.diagrams).for_each(|_| progress.inc("diagrams"));
            }
            progress.inc("docs");
            result.map(|(html, report)| (*doc, html, report))
        })
        .collect();
    progress.finish();

    let mut summary = BuildSummary::default();
    let mut entries = Vec::with_capacity(results.len());
    for result in results {
        let (doc, html, report) = result?;
        for (index, err) in &report.failures {
            log!("warning"; "{}: figure {} shown as source: {}", doc.file, index, err);
        }
        summary.docs += 1;
        summary.charts += report.charts;
        summary.diagrams += report.diagrams;
        summary.fallbacks += report.failures.len();
        let media = doc.parsed().map_or(0, |parsed| parsed.media_count());
        entries.push(DocEntry { doc, html, media });
    }

    let intro = discovery
        .intro
        .as_ref()
        .and_then(|intro| entries.iter().position(|e| e.doc.id == intro.id))
        .map(|pos| entries.remove(pos));
    write_index(&DocIndex { intro, docs: entries }, &output)?;

    log!(
        "build";
        "{} documents, {} charts, {} diagrams -> {}",
        summary.docs,
        summary.charts,
        summary.diagrams,
        output.display()
    );
    Ok(summary)
}

fn hydrator_for(config: &FolioConfig) -> Hydrator {
    let hydrator = Hydrator::new().with_layout(Arc::new(LayeredLayout::default()));
    let hydrator = if config.build.charts {
        hydrator
    } else {
        hydrator.without_charts()
    };
    if config.build.diagrams {
        hydrator
    } else {
        hydrator.without_layout()
    }
}

/// Parse, hydrate and write one fragment. Returns the fragment file name.
fn build_document(
    doc: &Document,
    source: &FsSource,
    hydrator: &Hydrator,
    output: &Path,
) -> Result<(String, HydrationReport)> {
    let parsed = load_document(doc, source)
        .with_context(|| format!("Failed to read {}", doc.file))?;

    let mut hydrated = parsed.clone();
    let report = hydrator.hydrate(&mut hydrated);

    let name = format!("{}.html", doc.id);
    let path = output.join(&name);
    fs::write(&path, hydrated.to_html())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("build"; "{} -> {}", doc.file, name);

    Ok((name, report))
}

fn write_index(index: &DocIndex<'_>, output: &Path) -> Result<PathBuf> {
    let path = output.join(INDEX_FILE);
    let json = serde_json::to_string_pretty(index).context("Failed to serialize document index")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> (TempDir, FolioConfig) {
        let dir = TempDir::new().unwrap();
        for (path, body) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        let mut config = test_parse_config("");
        config.root = dir.path().to_path_buf();
        (dir, config)
    }

    fn args() -> BuildArgs {
        BuildArgs { output: None }
    }

    #[test]
    fn test_build_empty_project() {
        let (dir, config) = project(&[]);
        let summary = build_site(&args(), &config).unwrap();
        assert_eq!(summary, BuildSummary::default());
        assert!(!dir.path().join("public").exists());
    }

    #[test]
    fn test_build_writes_fragments_and_index() {
        let chart = "# Lamp\n\n```chart-bar\n,Q1,Q2\nA,1,2\n```\n";
        let flow = "# Graph\n\n```flow\n[A] -> [B]\n```\n";
        let (dir, config) = project(&[
            ("content/about.md", "# Hello\n\nIntro text.\n"),
            ("content/projects/lamp.md", chart),
            ("content/research/graph.md", flow),
        ]);

        let summary = build_site(&args(), &config).unwrap();
        assert_eq!(summary.docs, 3);
        assert_eq!(summary.charts, 1);
        assert_eq!(summary.diagrams, 1);
        assert_eq!(summary.fallbacks, 0);

        let out = dir.path().join("public");
        let lamp = fs::read_to_string(out.join("projects-lamp.html")).unwrap();
        assert!(lamp.contains("<svg"));
        assert!(out.join("home.html").exists());

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(INDEX_FILE)).unwrap()).unwrap();
        assert_eq!(index["intro"]["id"], "home");
        assert_eq!(index["docs"].as_array().unwrap().len(), 2);
        assert_eq!(index["docs"][0]["html"], "research-graph.html");
    }

    #[test]
    fn test_build_without_diagrams_falls_back() {
        let (dir, mut config) = project(&[("content/graph.md", "# G\n\n```flow\n[A] -> [B]\n```\n")]);
        config.build.diagrams = false;

        let summary = build_site(&BuildArgs { output: Some("out".into()) }, &config).unwrap();
        assert_eq!(summary.diagrams, 0);
        assert_eq!(summary.fallbacks, 1);
        assert!(dir.path().join("out/graph.html").exists());
    }
}
