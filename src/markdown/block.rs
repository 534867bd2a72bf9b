//! Parsed document body: blocks, inline spans and media figures.

use serde::Serialize;

/// Inline formatting span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Strike(Vec<Inline>),
    Highlight(Vec<Inline>),
    Code(String),
    Link { href: String, children: Vec<Inline> },
    /// Hard line break between source lines of one paragraph.
    Break,
}

impl Inline {
    /// Concatenated text content, formatting dropped.
    pub fn plain_text(spans: &[Inline]) -> String {
        let mut out = String::new();
        for span in spans {
            span.push_text(&mut out);
        }
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Self::Text(text) | Self::Code(text) => out.push_str(text),
            Self::Strong(children)
            | Self::Emphasis(children)
            | Self::Strike(children)
            | Self::Highlight(children)
            | Self::Link { children, .. } => {
                for child in children {
                    child.push_text(out);
                }
            }
            Self::Break => out.push('\n'),
        }
    }
}

/// One block of the document body, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block", rename_all = "lowercase")]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph { content: Vec<Inline> },
    List { ordered: bool, items: Vec<Vec<Inline>> },
    /// Author-supplied markup that already starts with a tag.
    Html { raw: String },
    Figure(Figure),
}

impl Block {
    pub fn heading(level: u8, text: &str) -> Self {
        Self::Heading {
            level,
            content: vec![Inline::Text(text.to_string())],
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Self::Paragraph {
            content: vec![Inline::Text(text.to_string())],
        }
    }

    /// Media figures are the only blocks that anchor scroll sync.
    pub fn as_figure(&self) -> Option<&Figure> {
        match self {
            Self::Figure(figure) => Some(figure),
            _ => None,
        }
    }

    pub fn as_figure_mut(&mut self) -> Option<&mut Figure> {
        match self {
            Self::Figure(figure) => Some(figure),
            _ => None,
        }
    }
}

/// Type tag carried by every media figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Code,
    Quote,
    Chart,
    Flow,
    Prototype,
}

impl MediaKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::Chart => "chart",
            Self::Flow => "flow",
            Self::Prototype => "prototype",
        }
    }
}

/// Diagram flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "LR")]
    LeftToRight,
}

impl Direction {
    /// Parse `TB`/`TD`/`LR` (case-insensitive).
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" => Some(Self::TopToBottom),
            "LR" => Some(Self::LeftToRight),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopToBottom => "TB",
            Self::LeftToRight => "LR",
        }
    }
}

/// Embedded prototype surface from `::prototype{...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prototype {
    pub src: String,
    pub height: String,
    pub caption: Option<String>,
    pub bg: Option<String>,
}

/// Type-specific payload of a media figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Media {
    Image {
        src: String,
        alt: String,
        /// Display-fit hint from the image title.
        fit: Option<String>,
    },
    Code {
        lang: Option<String>,
        code: String,
    },
    Quote {
        lines: Vec<Vec<Inline>>,
    },
    Chart {
        kind: String,
        source: String,
    },
    #[serde(rename = "flow")]
    Diagram {
        direction: Option<Direction>,
        source: String,
    },
    Prototype(Prototype),
}

impl Media {
    pub const fn kind(&self) -> MediaKind {
        match self {
            Self::Image { .. } => MediaKind::Image,
            Self::Code { .. } => MediaKind::Code,
            Self::Quote { .. } => MediaKind::Quote,
            Self::Chart { .. } => MediaKind::Chart,
            Self::Diagram { .. } => MediaKind::Flow,
            Self::Prototype(_) => MediaKind::Prototype,
        }
    }

    /// Charts and diagrams are rendered lazily.
    pub const fn needs_hydration(&self) -> bool {
        matches!(self, Self::Chart { .. } | Self::Diagram { .. })
    }
}

/// Result of hydrating a chart or diagram figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "svg", rename_all = "lowercase")]
pub enum Rendered {
    Svg(String),
    /// Rendering failed; the raw source is shown as code instead.
    Fallback,
}

/// A media figure: the unit shown in the companion pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Figure {
    pub media: Media,
    /// Hydration marker. `Some` once rendered or degraded, never re-rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<Rendered>,
}

impl Figure {
    pub const fn new(media: Media) -> Self {
        Self {
            media,
            rendered: None,
        }
    }

    pub const fn kind(&self) -> MediaKind {
        self.media.kind()
    }

    pub const fn is_hydrated(&self) -> bool {
        self.rendered.is_some()
    }
}
