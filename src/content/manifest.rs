//! Manifest generation from a local content tree.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use jwalk::WalkDir;

use super::Manifest;

fn markdown_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| name.ends_with(".md"))
        .collect();
    names.sort();
    names
}

/// Root-level `.md` files, then `.md` files directly inside each folder.
///
/// Paths are prefixed with `content_dir`. Missing folders are skipped.
pub fn scan_content_files(root: &Path, content_dir: &str, folders: &[String]) -> Manifest {
    let content = root.join(content_dir);
    let mut files: Vec<String> = markdown_files(&content)
        .into_iter()
        .map(|name| format!("{content_dir}/{name}"))
        .collect();

    for folder in folders {
        let dir = content.join(folder);
        if !dir.is_dir() {
            continue;
        }
        files.extend(
            markdown_files(&dir)
                .into_iter()
                .map(|name| format!("{content_dir}/{folder}/{name}")),
        );
    }
    Manifest { files }
}

/// Serialise `manifest` to `path` as pretty JSON.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).context("Failed to serialize manifest")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_content_files() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("projects/deep")).unwrap();
        fs::create_dir_all(content.join("drafts")).unwrap();
        fs::write(content.join("about.md"), "# About").unwrap();
        fs::write(content.join("logo.png"), "").unwrap();
        fs::write(content.join("projects/b.md"), "# B").unwrap();
        fs::write(content.join("projects/a.md"), "# A").unwrap();
        fs::write(content.join("projects/deep/c.md"), "# C").unwrap();
        fs::write(content.join("drafts/x.md"), "# X").unwrap();

        let folders = vec!["projects".to_string(), "research".to_string()];
        let manifest = scan_content_files(dir.path(), "content", &folders);
        assert_eq!(
            manifest.files,
            vec!["content/about.md", "content/projects/a.md", "content/projects/b.md"]
        );

        let out = content.join("manifest.json");
        write_manifest(&manifest, &out).unwrap();
        let back: Manifest = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(back, manifest);
    }
}
