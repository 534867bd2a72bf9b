//! `[sync]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sync]
//! zone_down = 0.30          # Reading line fraction when scrolling down
//! zone_up = 0.45            # Reading line fraction when scrolling up
//! bottom_threshold = 0.95   # Scroll progress that forces the last figure
//! dead_zone = 5.0           # Pixels of scroll ignored for direction changes
//! debounce_ms = 150         # Resize / mutation debounce
//! collapse_below = 900.0    # Viewport width that collapses the media pane
//! sticky_headers = []       # Selectors whose sticky height offsets the line
//! split = "1:1"             # content:media column ratio
//! media_position = "right"  # or "left"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::sync::{MediaPosition, SyncOptions, parse_split};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub zone_down: f64,
    pub zone_up: f64,
    pub bottom_threshold: f64,
    pub dead_zone: f64,
    pub debounce_ms: u64,
    pub collapse_below: f64,
    pub sticky_headers: Vec<String>,
    pub split: String,
    pub media_position: MediaPosition,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let d = SyncOptions::default();
        Self {
            zone_down: d.zone_down,
            zone_up: d.zone_up,
            bottom_threshold: d.bottom_threshold,
            dead_zone: d.dead_zone,
            debounce_ms: u64::try_from(d.debounce.as_millis()).unwrap_or(150),
            collapse_below: d.collapse_below,
            sticky_headers: d.sticky_headers,
            split: d.split,
            media_position: d.media_position,
        }
    }
}

impl SyncConfig {
    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            zone_down: self.zone_down,
            zone_up: self.zone_up,
            bottom_threshold: self.bottom_threshold,
            dead_zone: self.dead_zone,
            debounce: Duration::from_millis(self.debounce_ms),
            collapse_below: self.collapse_below,
            sticky_headers: self.sticky_headers.clone(),
            split: self.split.clone(),
            media_position: self.media_position,
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, value) in [("sync.zone_down", self.zone_down), ("sync.zone_up", self.zone_up)] {
            if !(0.0..=1.0).contains(&value) {
                diag.error_with_hint(
                    field,
                    format!("{value} is outside [0, 1]"),
                    "use a fraction of the pane height",
                );
            }
        }

        if !(self.bottom_threshold > 0.0 && self.bottom_threshold <= 1.0) {
            diag.error(
                "sync.bottom_threshold",
                format!("{} is outside (0, 1]", self.bottom_threshold),
            );
        }

        if parse_split(&self.split).is_none() {
            diag.error_with_hint(
                "sync.split",
                format!("`{}` is not a ratio", self.split),
                "write it as N:M, e.g. \"3:2\"",
            );
        }

        if self.dead_zone < 0.0 {
            diag.error("sync.dead_zone", "must not be negative");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults_match_engine() {
        let config = test_parse_config("");
        assert_eq!(config.sync.options(), SyncOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sync_section() {
        let config = test_parse_config(
            "[sync]\nzone_down = 0.25\nsplit = \"3:2\"\nmedia_position = \"left\"\nsticky_headers = [\"header\"]\ndebounce_ms = 200",
        );
        let options = config.sync.options();
        assert_eq!(options.zone_down, 0.25);
        assert_eq!(options.media_position, MediaPosition::Left);
        assert_eq!(options.debounce, Duration::from_millis(200));
        assert_eq!(options.sticky_headers, ["header"]);
    }

    #[test]
    fn test_validation() {
        let mut diag = ConfigDiagnostics::new();
        let config = test_parse_config(
            "[sync]\nzone_up = 1.5\nbottom_threshold = 0.0\nsplit = \"half\"",
        );
        config.sync.validate(&mut diag);
        let fields: Vec<&str> = diag.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, ["sync.zone_up", "sync.bottom_threshold", "sync.split"]);
    }
}
