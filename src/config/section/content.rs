//! `[content]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [content]
//! dir = "content"                                # Content root
//! folders = ["projects", "experiments", "research"]
//! intro = ["about.md", "index.md", "intro.md"]   # Priority order
//! manifest = "manifest.json"                     # Relative to the content root
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::content::DiscoveryOptions;

/// Where documents live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content root, relative to the project root.
    pub dir: String,

    /// Category folders, in display order.
    pub folders: Vec<String>,

    /// Intro file names checked at the content root, first match wins.
    pub intro: Vec<String>,

    /// Manifest file name inside the content root.
    pub manifest: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        let defaults = DiscoveryOptions::default();
        Self {
            dir: defaults.content_dir,
            folders: defaults.folders,
            intro: defaults.intro,
            manifest: "manifest.json".into(),
        }
    }
}

impl ContentConfig {
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            content_dir: self.dir.trim_matches('/').to_string(),
            folders: self.folders.clone(),
            intro: self.intro.clone(),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let dir = self.dir.trim_matches('/');
        if dir.is_empty() {
            diag.error("content.dir", "must not be empty");
        } else if dir.split('/').any(|s| s == "..") {
            diag.error_with_hint(
                "content.dir",
                format!("`{}` leaves the project root", self.dir),
                "use a path inside the project, e.g. \"content\"",
            );
        }

        for folder in &self.folders {
            if folder.is_empty() || folder.contains('/') {
                diag.error_with_hint(
                    "content.folders",
                    format!("`{folder}` is not a single folder name"),
                    "folders are scanned one level deep",
                );
            }
        }
    }
}
