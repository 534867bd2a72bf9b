//! Content discovery.
//!
//! Documents are found through the provider's manifest, or by probing the
//! root and each configured folder for `.md` links when the manifest is
//! missing or empty. Intro files at the content root become the
//! distinguished home document; every other file must contain a heading
//! marker to count as a document.

mod filter;
pub mod manifest;
mod source;

use std::sync::{LazyLock, OnceLock};

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;

use crate::debug;
use crate::markdown::{self, Frontmatter, ParsedDocument, split_frontmatter};

pub use filter::{
    FilterOptions, SearchCommand, SortOrder, UnknownSort, apply_filters, extract_categories,
    parse_search_input,
};
pub use source::{ContentSource, FsSource, Manifest, extract_md_links};

/// Id given to the intro document.
pub const INTRO_ID: &str = "home";

/// Group name for documents at the content root.
pub const UNCATEGORIZED: &str = "other";

static FIRST_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("valid regex"));

/// Where discovery looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub content_dir: String,
    pub folders: Vec<String>,
    /// Intro file names in priority order.
    pub intro: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            content_dir: "content".into(),
            folders: vec!["projects".into(), "experiments".into(), "research".into()],
            intro: vec!["about.md".into(), "index.md".into(), "intro.md".into()],
        }
    }
}

// ============================================================================
// Document
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub file: String,
    pub label: String,
    pub category: Option<String>,
    pub frontmatter: Frontmatter,
    #[serde(skip)]
    content: OnceLock<String>,
    #[serde(skip)]
    parsed: OnceLock<ParsedDocument>,
}

/// `content/projects/lamp.md` → `projects-lamp`.
pub fn path_to_id(path: &str, content_dir: &str) -> String {
    let rel = strip_content_dir(path, content_dir);
    rel.strip_suffix(".md").unwrap_or(rel).replace('/', "-")
}

fn strip_content_dir<'a>(path: &'a str, content_dir: &str) -> &'a str {
    path.strip_prefix(content_dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}

impl Document {
    /// Build a document from its raw text.
    ///
    /// Returns `None` when the text has no `#` at all.
    pub fn from_raw(path: &str, raw: String, content_dir: &str) -> Option<Self> {
        if !raw.contains('#') {
            return None;
        }

        let (frontmatter, _) = split_frontmatter(&raw);
        let parts: Vec<&str> = strip_content_dir(path, content_dir).split('/').collect();
        let category = (parts.len() > 1).then(|| parts[0].to_string());
        let filename = parts.last().copied().unwrap_or(path);

        let label = frontmatter
            .title()
            .map(str::to_string)
            .or_else(|| FIRST_HEADING.captures(&raw).map(|c| c[1].trim().to_string()))
            .unwrap_or_else(|| filename.strip_suffix(".md").unwrap_or(filename).to_string());

        Some(Self {
            id: path_to_id(path, content_dir),
            file: path.to_string(),
            label,
            category,
            frontmatter,
            content: OnceLock::from(raw),
            parsed: OnceLock::new(),
        })
    }

    /// Raw text, once fetched.
    pub fn content(&self) -> Option<&str> {
        self.content.get().map(String::as_str)
    }

    /// Parsed body, once loaded.
    pub fn parsed(&self) -> Option<&ParsedDocument> {
        self.parsed.get()
    }

    /// Directory of the document file, used to resolve relative media.
    pub fn base_dir(&self) -> &str {
        self.file.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    pub fn published(&self) -> Option<&str> {
        self.frontmatter.published()
    }
}

fn probe(source: &dyn ContentSource, path: &str, content_dir: &str) -> Option<Document> {
    let raw = source.fetch(path)?;
    let doc = Document::from_raw(path, raw, content_dir);
    if doc.is_none() {
        debug!("discover"; "skipping {path}: no heading");
    }
    doc
}

/// Fetch (if needed) and parse a document, caching both.
///
/// Media URLs resolve against the document's directory. Later calls return
/// the cached parse without touching `source`.
pub fn load_document<'a>(doc: &'a Document, source: &dyn ContentSource) -> Option<&'a ParsedDocument> {
    if let Some(parsed) = doc.parsed.get() {
        return Some(parsed);
    }
    let content = match doc.content.get() {
        Some(content) => content,
        None => {
            let raw = source.fetch(&doc.file)?;
            doc.content.get_or_init(|| raw)
        }
    };
    Some(
        doc.parsed
            .get_or_init(|| markdown::parse_with_base(content, doc.base_dir())),
    )
}

// ============================================================================
// Discovery
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
pub struct Discovery {
    pub docs: Vec<Document>,
    pub intro: Option<Document>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty() && self.intro.is_none()
    }

    pub fn find(&self, id: &str) -> Option<&Document> {
        self.intro
            .iter()
            .chain(&self.docs)
            .find(|doc| doc.id == id)
    }
}

/// Candidate paths split into content root files and folder files.
struct Candidates {
    root: Vec<String>,
    folders: Vec<String>,
}

fn candidates(source: &dyn ContentSource, options: &DiscoveryOptions) -> Candidates {
    let prefix = format!("{}/", options.content_dir);

    if let Some(manifest) = source.manifest()
        && !manifest.files.is_empty()
    {
        let (root, folders): (Vec<String>, Vec<String>) = manifest
            .files
            .into_iter()
            .partition(|f| !strip_content_dir(f, &options.content_dir).contains('/'));
        return Candidates { root, folders };
    }

    debug!("discover"; "no manifest, probing folders");
    let listed = |folder: Option<&str>| -> Vec<String> {
        let Some(listing) = source.list_folder(folder) else {
            return Vec::new();
        };
        extract_md_links(&listing)
            .into_iter()
            .map(|name| match folder {
                Some(folder) => format!("{prefix}{folder}/{name}"),
                None => format!("{prefix}{name}"),
            })
            .collect()
    };

    Candidates {
        root: listed(None),
        folders: options
            .folders
            .iter()
            .flat_map(|folder| listed(Some(folder)))
            .collect(),
    }
}

/// Find every document. Unreachable or invalid files are dropped.
pub fn discover(source: &dyn ContentSource, options: &DiscoveryOptions) -> Discovery {
    let Candidates { root, folders } = candidates(source, options);
    let content_dir = options.content_dir.as_str();

    let intro = options.intro.iter().find_map(|name| {
        let path = format!("{content_dir}/{name}");
        if !root.contains(&path) {
            return None;
        }
        let mut doc = probe(source, &path, content_dir)?;
        doc.id = INTRO_ID.to_string();
        doc.category = None;
        Some(doc)
    });

    // Every intro candidate is kept out of the document list, chosen or not.
    let is_intro = |path: &str| {
        options
            .intro
            .iter()
            .any(|name| path == format!("{content_dir}/{name}"))
    };
    let paths: Vec<&String> = folders
        .iter()
        .chain(root.iter().filter(|path| !is_intro(path.as_str())))
        .collect();

    let mut docs: Vec<Document> = paths
        .par_iter()
        .filter_map(|path| probe(source, path, content_dir))
        .collect();
    docs.sort_by(|a, b| a.label.cmp(&b.label));

    debug!("discover"; "{} documents, intro: {}", docs.len(), intro.is_some());
    Discovery { docs, intro }
}

/// Documents grouped by category.
///
/// Configured folders come first in their configured order, then any other
/// categories as first seen, then root-level documents under
/// [`UNCATEGORIZED`]. Empty groups are omitted.
pub fn group_by_category<'a>(docs: &'a [Document], folders: &[String]) -> Vec<(String, Vec<&'a Document>)> {
    let mut groups: Vec<(String, Vec<&Document>)> = folders
        .iter()
        .map(|folder| (folder.clone(), Vec::new()))
        .collect();

    for doc in docs {
        let name = doc.category.as_deref().unwrap_or(UNCATEGORIZED);
        match groups.iter_mut().find(|(group, _)| group == name) {
            Some((_, members)) => members.push(doc),
            None => groups.push((name.to_string(), vec![doc])),
        }
    }

    // Root-level documents always close the list.
    if let Some(pos) = groups.iter().position(|(name, _)| name == UNCATEGORIZED) {
        let other = groups.remove(pos);
        groups.push(other);
    }
    groups.retain(|(_, members)| !members.is_empty());
    groups
}
