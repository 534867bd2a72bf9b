//! Document parser.
//!
//! `parse` turns raw document text into a [`Frontmatter`] record and an
//! ordered block list. Parsing never fails: unrecognised syntax degrades to
//! plain paragraphs.
//!
//! # Example
//!
//! ```
//! let doc = folio::markdown::parse("---\ntitle: Hi\n---\n# Hi\n```chart-bar\n,A\nx,1\n```");
//! assert_eq!(doc.frontmatter.title(), Some("Hi"));
//! assert_eq!(doc.media_count(), 1);
//! ```

mod block;
mod body;
mod frontmatter;
mod html;
mod inline;
pub mod resolve;

use serde::Serialize;

pub use block::{Block, Direction, Figure, Inline, Media, MediaKind, Prototype, Rendered};
pub use frontmatter::{FieldValue, Frontmatter, split_frontmatter};
pub use html::{render_blocks, render_figure};
pub use inline::parse_inline;

/// Parsed document: header record plus body blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedDocument {
    pub frontmatter: Frontmatter,
    pub blocks: Vec<Block>,
}

impl ParsedDocument {
    /// Media figures in document order.
    pub fn figures(&self) -> impl Iterator<Item = &Figure> {
        self.blocks.iter().filter_map(Block::as_figure)
    }

    pub fn figures_mut(&mut self) -> impl Iterator<Item = &mut Figure> {
        self.blocks.iter_mut().filter_map(Block::as_figure_mut)
    }

    pub fn media_count(&self) -> usize {
        self.figures().count()
    }

    /// Text of the first level-1 heading.
    pub fn first_heading(&self) -> Option<String> {
        self.blocks.iter().find_map(|block| match block {
            Block::Heading { level: 1, content } => Some(Inline::plain_text(content)),
            _ => None,
        })
    }

    pub fn to_html(&self) -> String {
        render_blocks(&self.blocks)
    }
}

/// Parse a document whose media URLs are already absolute.
pub fn parse(raw: &str) -> ParsedDocument {
    parse_with_base(raw, "")
}

/// Parse a document, resolving relative media URLs against `base_dir`.
pub fn parse_with_base(raw: &str, base_dir: &str) -> ParsedDocument {
    let (frontmatter, body) = split_frontmatter(raw);
    ParsedDocument {
        frontmatter,
        blocks: body::parse_body(body, base_dir),
    }
}
