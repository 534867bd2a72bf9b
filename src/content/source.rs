//! Where documents come from.
//!
//! Discovery only needs three answers from a content provider: the
//! manifest, a document's raw text, and a folder listing. Every one of them
//! may be absent, which is never an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::debug;

static MD_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href="([^"]+\.md)""#).expect("valid regex"));

/// Manifest body: `{"files": ["content/about.md", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub files: Vec<String>,
}

/// Content provider.
///
/// Paths are relative to the provider root and use `/` separators,
/// e.g. `content/projects/lamp.md`.
pub trait ContentSource: Send + Sync {
    /// Listed document paths, `None` when there is no usable manifest.
    fn manifest(&self) -> Option<Manifest>;

    /// Raw document text, `None` when unreachable.
    fn fetch(&self, path: &str) -> Option<String>;

    /// HTML listing of a content folder (`None` = content root).
    fn list_folder(&self, folder: Option<&str>) -> Option<String>;
}

/// `.md` targets of `href="..."` attributes in a listing, in order.
pub fn extract_md_links(listing: &str) -> Vec<String> {
    MD_HREF
        .captures_iter(listing)
        .map(|caps| caps[1].to_string())
        .collect()
}

// ============================================================================
// Filesystem source
// ============================================================================

/// Serves a project directory the way a static web server would.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    content_dir: String,
    manifest: String,
}

impl FsSource {
    /// `root` holds `content_dir`; `manifest` is relative to `content_dir`.
    pub fn new(root: impl Into<PathBuf>, content_dir: &str, manifest: &str) -> Self {
        Self {
            root: root.into(),
            content_dir: content_dir.trim_matches('/').to_string(),
            manifest: manifest.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a `/`-separated relative path onto the filesystem, refusing
    /// anything that climbs out of the root.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut out = self.root.clone();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => return None,
                s => out.push(s),
            }
        }
        Some(out)
    }
}

impl ContentSource for FsSource {
    fn manifest(&self) -> Option<Manifest> {
        let path = self.resolve(&format!("{}/{}", self.content_dir, self.manifest))?;
        let text = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<Manifest>(&text) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                debug!("discover"; "ignoring manifest {}: {e}", path.display());
                None
            }
        }
    }

    fn fetch(&self, path: &str) -> Option<String> {
        let file = self.resolve(path)?;
        fs::read_to_string(&file)
            .inspect_err(|e| debug!("discover"; "cannot read {}: {e}", file.display()))
            .ok()
    }

    fn list_folder(&self, folder: Option<&str>) -> Option<String> {
        let rel = match folder {
            Some(folder) => format!("{}/{folder}", self.content_dir),
            None => self.content_dir.clone(),
        };
        let dir = self.resolve(&rel)?;

        let mut names: Vec<String> = fs::read_dir(&dir)
            .ok()?
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();

        let mut html = String::from("<ul>\n");
        for name in names {
            let name = crate::utils::html::escape_attr(&name);
            html.push_str(&format!("<li><a href=\"{name}\">{name}</a></li>\n"));
        }
        html.push_str("</ul>\n");
        Some(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("projects")).unwrap();
        fs::write(content.join("about.md"), "# About").unwrap();
        fs::write(content.join("projects/lamp.md"), "# Lamp").unwrap();
        fs::write(content.join("projects/notes.txt"), "skip").unwrap();
        dir
    }

    #[test]
    fn test_extract_md_links() {
        let html = r#"<a href="a.md">a</a> <a HREF="b.MD">b</a> <a href="c.txt">c</a>"#;
        assert_eq!(extract_md_links(html), vec!["a.md", "b.MD"]);
    }

    #[test]
    fn test_listing_probe() {
        let dir = project();
        let source = FsSource::new(dir.path(), "content", "manifest.json");
        let listing = source.list_folder(Some("projects")).unwrap();
        assert_eq!(extract_md_links(&listing), vec!["lamp.md"]);
        assert_eq!(extract_md_links(&source.list_folder(None).unwrap()), vec!["about.md"]);
        assert!(source.list_folder(Some("missing")).is_none());
    }

    #[test]
    fn test_fetch() {
        let dir = project();
        let source = FsSource::new(dir.path(), "content", "manifest.json");
        assert_eq!(source.fetch("content/projects/lamp.md").as_deref(), Some("# Lamp"));
        assert!(source.fetch("content/nope.md").is_none());
        assert!(source.fetch("content/../../etc/passwd").is_none());
    }

    #[test]
    fn test_manifest_absent_or_malformed() {
        let dir = project();
        let source = FsSource::new(dir.path(), "content", "manifest.json");
        assert!(source.manifest().is_none());

        fs::write(dir.path().join("content/manifest.json"), "{not json").unwrap();
        assert!(source.manifest().is_none());

        fs::write(
            dir.path().join("content/manifest.json"),
            r#"{"files": ["content/about.md"]}"#,
        )
        .unwrap();
        assert_eq!(source.manifest().unwrap().files, vec!["content/about.md"]);
    }
}
