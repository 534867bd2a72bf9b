//! SVG chart engine.
//!
//! Source text is parsed by [`parse_source`] into metadata and a table, then
//! reshaped per kind and drawn into an [`Element`] tree. Degenerate input
//! never fails: it renders a "No data" placeholder, and an unrecognised kind
//! renders `Unknown: <kind>`.

mod bar;
mod frame;
mod line;
mod pie;
pub mod scale;
mod scatter;
pub mod source;
pub mod theme;

use std::fmt;
use std::str::FromStr;

use crate::svg::Element;

pub use source::{ChartSource, parse_source};

/// The eight supported chart variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    HBar,
    Line,
    Area,
    Stacked,
    Pie,
    Donut,
    Scatter,
}

impl ChartKind {
    pub const ALL: [Self; 8] = [
        Self::Bar,
        Self::HBar,
        Self::Line,
        Self::Area,
        Self::Stacked,
        Self::Pie,
        Self::Donut,
        Self::Scatter,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::HBar => "hbar",
            Self::Line => "line",
            Self::Area => "area",
            Self::Stacked => "stacked",
            Self::Pie => "pie",
            Self::Donut => "donut",
            Self::Scatter => "scatter",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised chart kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for ChartKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Pick the kind name: an explicit fence kind wins over `type:` metadata,
/// which wins over `bar`.
pub fn resolve_kind<'a>(explicit: Option<&'a str>, source: &'a ChartSource) -> &'a str {
    explicit
        .filter(|kind| !kind.is_empty())
        .or_else(|| source.meta("type"))
        .unwrap_or("bar")
}

/// Draw already-parsed source as `kind`.
pub fn render(kind: ChartKind, source: &ChartSource) -> Element {
    match kind {
        ChartKind::Bar => bar::render_bar(source),
        ChartKind::HBar => bar::render_hbar(source),
        ChartKind::Stacked => bar::render_stacked(source),
        ChartKind::Line => line::render_line(source),
        ChartKind::Area => line::render_area(source),
        ChartKind::Pie => pie::render_pie(source, false),
        ChartKind::Donut => pie::render_pie(source, true),
        ChartKind::Scatter => scatter::render_scatter(source),
    }
}

/// Parse and draw chart text. `kind` is the fence kind, if any.
pub fn render_chart(text: &str, kind: Option<&str>) -> Element {
    let source = parse_source(text);
    let name = resolve_kind(kind, &source);
    match name.parse::<ChartKind>() {
        Ok(kind) => render(kind, &source),
        Err(UnknownKind(name)) => theme::placeholder(&format!("Unknown: {name}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip_names() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.as_str().parse::<ChartKind>(), Ok(kind));
        }
        assert!("radar".parse::<ChartKind>().is_err());
    }

    #[test]
    fn test_kind_resolution_order() {
        let typed = parse_source("type: pie\nA, 1");
        assert_eq!(resolve_kind(Some("line"), &typed), "line");
        assert_eq!(resolve_kind(Some(""), &typed), "pie");
        assert_eq!(resolve_kind(None, &typed), "pie");
        assert_eq!(resolve_kind(None, &parse_source("A, 1")), "bar");
    }

    #[test]
    fn test_unknown_kind_placeholder() {
        let svg = render_chart(",a\nx,1", Some("radar"));
        assert_eq!(svg.text_content(), "Unknown: radar");
    }

    #[test]
    fn test_every_kind_survives_empty_input() {
        for kind in ChartKind::ALL {
            let svg = render(kind, &parse_source(""));
            assert_eq!(svg.text_content(), "No data", "{kind}");
        }
    }

    #[test]
    fn test_every_kind_renders_svg() {
        let src = "title: Mixed\n,a,b\nx,1,2\ny,3,4";
        for kind in ChartKind::ALL {
            let out = render_chart(src, Some(kind.as_str())).to_svg();
            assert!(out.starts_with("<svg"), "{kind}");
            assert!(out.contains("data-tip="), "{kind}");
        }
    }
}
