//! Colours and text primitives shared by every chart.
//!
//! Colours are CSS custom properties with fallbacks, so a page can re-theme
//! charts without re-rendering them.

use crate::svg::{self, Element};

/// Category palette, cycled by series or slice index.
pub const PALETTE: [&str; 6] = [
    "var(--fc-p1, #c8a030)",
    "var(--fc-p2, #a07828)",
    "var(--fc-p3, #d4b450)",
    "var(--fc-p4, #8a6020)",
    "var(--fc-p5, #e0c868)",
    "var(--fc-p6, #705018)",
];

pub const FG: &str = "var(--fc-fg, #1a1a1a)";
pub const DIM: &str = "var(--fc-dim, #888)";
pub const GRID: &str = "var(--fc-grid, #e0e0de)";
pub const BG: &str = "var(--fc-bg, #fafaf8)";

const FONT: &str = "var(--fc-mono, ui-monospace, 'SF Mono', monospace)";

pub fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Centred text. Override `text-anchor` / `dominant-baseline` with `attr`.
pub fn text(x: f64, y: f64, content: impl Into<String>, size: f64, fill: &str) -> Element {
    Element::new("text")
        .attr("x", x)
        .attr("y", y)
        .attr("fill", fill)
        .attr("font-family", FONT)
        .attr("font-size", size)
        .attr("text-anchor", "middle")
        .attr("dominant-baseline", "auto")
        .text(content)
}

pub fn title(x: f64, y: f64, content: &str) -> Element {
    text(x, y, content, 14.0, FG)
        .attr("text-anchor", "start")
        .attr("style", "font-weight:500;opacity:0.8")
}

pub fn description(x: f64, y: f64, content: &str) -> Element {
    text(x, y, content, 11.0, DIM)
        .attr("text-anchor", "start")
        .attr("style", "opacity:0.6")
}

/// Title and description stacked from `y`; returns the next free baseline.
pub fn header(root: &mut Element, title_text: Option<&str>, desc: Option<&str>, x: f64, y: f64) -> f64 {
    let mut y = y;
    if let Some(content) = title_text {
        root.push(title(x, y, content));
        y += 22.0;
    }
    if let Some(content) = desc {
        root.push(description(x, y, content));
        y += 18.0;
    }
    y
}

/// Header height used by the standalone (non-grid) charts.
pub fn header_height(has_title: bool, has_desc: bool) -> f64 {
    (if has_title { 24.0 } else { 0.0 }) + (if has_desc { 18.0 } else { 0.0 })
}

/// Small framed message in place of a chart.
pub fn placeholder(message: &str) -> Element {
    let mut root = svg::root(300.0, 120.0).attr("data-placeholder", "true");
    root.push(text(150.0, 60.0, message, 14.0, DIM));
    root
}
