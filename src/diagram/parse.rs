//! Diagram source text.
//!
//! ```text
//! # Login flow
//! dir: LR
//! [<icon:user> Client] -> credentials -> [Gateway]
//! [Gateway] [<database> Users]
//! ```
//!
//! Leading `key: value` and `#` lines are metadata. Every later line may
//! name nodes in brackets; two or more on one line chain into edges.

use std::sync::LazyLock;

use regex::Regex;

use crate::markdown::Direction;

static META: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s*:\s*(.+)$").expect("valid regex"));
static NODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?:<([\w\s:]+)>\s*)?([^\]]+)\]").expect("valid regex")
});
static EDGE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^->\s*(.+?)\s*->$").expect("valid regex"));

/// Node outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    Rect,
    Diamond,
    Ellipse,
    Database,
    Hexagon,
    #[default]
    RoundRect,
}

impl Shape {
    /// Unknown keywords fall back to the default outline.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "rect" => Self::Rect,
            "diamond" => Self::Diamond,
            "ellipse" => Self::Ellipse,
            "database" => Self::Database,
            "hexagon" => Self::Hexagon,
            _ => Self::RoundRect,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Diamond => "diamond",
            Self::Ellipse => "ellipse",
            Self::Database => "database",
            Self::Hexagon => "hexagon",
            Self::RoundRect => "roundrect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    /// Label text, also the node's identity.
    pub label: String,
    pub shape: Shape,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
    /// Empty when the edge has no label.
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramSource {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    /// Lowercased keys, in source order.
    pub meta: Vec<(String, String)>,
}

impl DiagramSource {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.meta("title").filter(|t| !t.is_empty())
    }

    /// `dir:` (or `direction:`) metadata.
    pub fn direction(&self) -> Option<Direction> {
        self.meta("dir")
            .or_else(|| self.meta("direction"))
            .and_then(Direction::from_token)
    }

    pub fn node(&self, label: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.label == label)
    }
}

/// Parse diagram text. Unmatched lines are ignored.
pub fn parse(text: &str) -> DiagramSource {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut source = DiagramSource::default();
    let mut data_start = 0;
    for (i, line) in lines.iter().enumerate() {
        if line.starts_with('#') {
            data_start = i + 1;
            continue;
        }
        match META.captures(line) {
            Some(caps) if !line.contains('[') && !line.contains("->") => {
                source
                    .meta
                    .push((caps[1].to_lowercase(), caps[2].trim().to_string()));
                data_start = i + 1;
            }
            _ => break,
        }
    }

    if let Some(heading) = lines[..data_start].iter().find(|l| l.starts_with('#')) {
        let title = heading.trim_start_matches('#').trim();
        source.meta.push(("title".to_string(), title.to_string()));
    }

    for line in &lines[data_start..] {
        if line.starts_with('#') {
            continue;
        }
        parse_line(line, &mut source);
    }
    source
}

fn parse_line(line: &str, source: &mut DiagramSource) {
    let matches: Vec<_> = NODE.captures_iter(line).collect();

    for caps in &matches {
        let label = caps[2].trim().to_string();
        if source.node(&label).is_some() {
            continue;
        }
        let mut shape = Shape::default();
        let mut icon = None;
        let modifiers = caps.get(1).map_or("", |m| m.as_str());
        for modifier in modifiers.split_whitespace() {
            match modifier.strip_prefix("icon:") {
                Some(name) => icon = Some(name.to_string()),
                None => shape = Shape::from_keyword(modifier),
            }
        }
        source.nodes.push(DiagramNode { label, shape, icon });
    }

    for pair in matches.windows(2) {
        let (Some(a), Some(b)) = (pair[0].get(0), pair[1].get(0)) else {
            continue;
        };
        let between = line[a.end()..b.start()].trim();
        let label = EDGE_LABEL
            .captures(between)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_default();
        source.edges.push(DiagramEdge {
            from: pair[0][2].trim().to_string(),
            to: pair[1][2].trim().to_string(),
            label,
        });
    }
}
