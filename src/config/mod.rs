//! Project configuration from `folio.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [content], [sync], [build]
//! ├── error          # ConfigError, ConfigDiagnostics
//! └── mod.rs         # FolioConfig (this file)
//! ```
//!
//! Every field has a default, so a missing file yields a working
//! configuration rooted at the current directory.

mod error;
pub mod section;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use section::{BuildConfig, ContentConfig, SyncConfig};

use crate::log;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "folio.toml";

// ============================================================================
// root configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Config file the values came from, if any (internal use only).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root: the config file's directory (internal use only).
    #[serde(skip)]
    pub root: PathBuf,

    pub content: ContentConfig,
    pub sync: SyncConfig,
    pub build: BuildConfig,
}

impl FolioConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Otherwise `folio.toml` is searched
    /// upward from `cwd`; when none is found the defaults apply, rooted at
    /// `cwd`.
    pub fn load(path: Option<&Path>, cwd: &Path) -> Result<Self> {
        let found = match path {
            Some(path) => {
                let path = if path.is_absolute() { path.to_path_buf() } else { cwd.join(path) };
                if !path.is_file() {
                    return Err(ConfigError::Validation(format!(
                        "config file `{}` not found",
                        path.display()
                    ))
                    .into());
                }
                Some(path)
            }
            None => find_config_file(cwd, Path::new(CONFIG_FILE)),
        };

        let mut config = match &found {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        config.root = found
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
        config.config_path = found;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content without unknown field detection.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Check every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.content.validate(&mut diag);
        self.sync.validate(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Directory `FsSource` serves from.
    pub fn project_root(&self) -> &Path {
        &self.root
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root.join(self.content.dir.trim_matches('/'))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.build.output)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.content_dir().join(&self.content.manifest)
    }
}

/// Search `start` and its ancestors for `name`.
pub fn find_config_file(start: &Path, name: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return name.is_file().then(|| name.to_path_buf());
    }
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse inline TOML, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(toml: &str) -> FolioConfig {
    let (parsed, ignored) = FolioConfig::parse_with_ignored(toml).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
