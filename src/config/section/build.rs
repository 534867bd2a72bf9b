//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "public"   # Written fragments and docs.json
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory, relative to the project root.
    pub output: PathBuf,

    /// Render charts during build.
    pub charts: bool,

    /// Render flow diagrams during build.
    pub diagrams: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "public".into(),
            charts: true,
            diagrams: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_build_section() {
        let config = test_parse_config("[build]\noutput = \"dist\"\ndiagrams = false");
        assert_eq!(config.build.output.to_str(), Some("dist"));
        assert!(config.build.charts);
        assert!(!config.build.diagrams);
    }
}
