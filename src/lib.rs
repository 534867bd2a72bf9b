//! Folio - a portfolio document pipeline.
//!
//! Markdown documents with frontmatter become media blocks; chart and
//! diagram figures are hydrated into SVG; discovery, filtering and a
//! scroll-sync state machine drive the viewer around them.

pub mod chart;
pub mod cli;
pub mod config;
pub mod content;
pub mod diagram;
pub mod hydrate;
pub mod icons;
pub mod logger;
pub mod markdown;
pub mod svg;
pub mod sync;
pub mod utils;
