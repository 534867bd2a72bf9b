//! Filtering, search commands and sorting over discovered documents.
//!
//! All functions are pure and return new vectors; the input slice is never
//! reordered.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::Document;

/// Parsed search box input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCommand {
    pub query: String,
    pub show_drafts: bool,
    pub show_archive: bool,
    pub reveal_id: Option<String>,
}

/// Recognise `show:drafts`, `show:archive` and `reveal:<id>`
/// (case-insensitive). Anything else is a plain query.
pub fn parse_search_input(raw: &str) -> SearchCommand {
    let trimmed = raw.trim();
    let mut command = SearchCommand::default();

    if trimmed.is_empty() {
        return command;
    }
    if trimmed.eq_ignore_ascii_case("show:drafts") {
        command.show_drafts = true;
        return command;
    }
    if trimmed.eq_ignore_ascii_case("show:archive") {
        command.show_archive = true;
        return command;
    }
    if let Some(prefix) = trimmed.get(..7)
        && prefix.eq_ignore_ascii_case("reveal:")
        && trimmed.len() > 7
    {
        command.reveal_id = Some(trimmed[7..].trim().to_string());
        return command;
    }

    command.query = trimmed.to_string();
    command
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Input order.
    #[default]
    Default,
    /// Newest published date first, undated last.
    Date,
    /// Ascending by label.
    Alpha,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Date => "date",
            Self::Alpha => "alpha",
        }
    }

    /// Cycle default → date → alpha → default.
    pub const fn next(self) -> Self {
        match self {
            Self::Default => Self::Date,
            Self::Date => Self::Alpha,
            Self::Alpha => Self::Default,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order `{0}` (expected default, date or alpha)")]
pub struct UnknownSort(String);

impl FromStr for SortOrder {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "date" => Ok(Self::Date),
            "alpha" => Ok(Self::Alpha),
            _ => Err(UnknownSort(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Exact category match; `None` keeps every category.
    pub category: Option<String>,
    /// Raw search input, commands included.
    pub search: String,
    pub sort: SortOrder,
}

/// Unique category names, sorted.
pub fn extract_categories(docs: &[Document]) -> Vec<String> {
    let mut categories: Vec<String> = docs.iter().filter_map(|d| d.category.clone()).collect();
    categories.sort();
    categories.dedup();
    categories
}

fn is_visible(doc: &Document, command: &SearchCommand) -> bool {
    let status = doc.frontmatter.status();

    if command.reveal_id.as_deref() == Some(doc.id.as_str()) {
        return true;
    }
    if command.show_drafts && status == Some("draft") {
        return true;
    }
    if command.show_archive && status == Some("archive") {
        return true;
    }
    matches!(status, None | Some("published"))
}

fn matches_query(doc: &Document, needle: &str) -> bool {
    let description = doc.frontmatter.description().unwrap_or_default();
    let tags = doc.frontmatter.tags().join(" ");
    [doc.label.as_str(), description, tags.as_str()]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(needle))
}

/// Visibility, then category, then free text, then sort.
pub fn apply_filters<'a>(docs: &'a [Document], options: &FilterOptions) -> Vec<&'a Document> {
    let command = parse_search_input(&options.search);
    let needle = command.query.to_lowercase();

    let mut result: Vec<&Document> = docs
        .iter()
        .filter(|doc| is_visible(doc, &command))
        .filter(|doc| {
            options
                .category
                .as_deref()
                .is_none_or(|category| doc.category.as_deref() == Some(category))
        })
        .filter(|doc| needle.is_empty() || matches_query(doc, &needle))
        .collect();

    match options.sort {
        SortOrder::Default => {}
        SortOrder::Date => result.sort_by(|a, b| {
            let a = a.frontmatter.published().unwrap_or_default();
            let b = b.frontmatter.published().unwrap_or_default();
            b.cmp(a)
        }),
        SortOrder::Alpha => result.sort_by(|a, b| a.label.cmp(&b.label)),
    }
    result
}
