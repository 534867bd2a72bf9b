//! Frontmatter extraction.
//!
//! The header is a small YAML-like dialect delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Example
//! tags:
//!     - alpha
//!     - beta
//! date:
//!     published: 2024-01-05
//! ---
//! ```
//!
//! Indentation decides structure. An indented `- value` appends to the
//! current key's list, an indented `key: value` sets a nested field on the
//! current key, and an unindented `key: value` starts a new current key.
//! Unmatched lines are ignored; parsing never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+-\s+(.+)$").expect("valid regex"));
static NESTED_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+([\w-]+):\s*(.*)$").expect("valid regex"));
static TOP_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w-]+):\s*(.*)$").expect("valid regex"));

/// Value stored under a frontmatter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// `key:` with nothing after it.
    Null,
    Text(String),
    List(Vec<String>),
    /// Nested `sub: value` pairs, in source order.
    Map(Vec<(String, String)>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn get(&self, sub: &str) -> Option<&str> {
        match self {
            Self::Map(fields) => fields.iter().find(|(k, _)| k == sub).map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Text(text) => serializer.serialize_str(text),
            Self::List(items) => items.serialize(serializer),
            Self::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Ordered key/value record parsed from the document header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: Vec<(String, FieldValue)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.fields.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Scalar value of `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    /// List value of `key`, empty when absent or not a list.
    pub fn list(&self, key: &str) -> &[String] {
        self.get(key).and_then(FieldValue::as_list).unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    pub fn status(&self) -> Option<&str> {
        self.text("status")
    }

    pub fn tags(&self) -> &[String] {
        self.list("tags")
    }

    /// `date.published`, or a plain scalar `date`.
    pub fn published(&self) -> Option<&str> {
        match self.get("date")? {
            FieldValue::Text(date) => Some(date),
            value => value.get("published"),
        }
    }

    /// Render back to header syntax (without the `---` fences).
    pub fn to_header(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.fields {
            match value {
                FieldValue::Null => out.push_str(&format!("{key}:\n")),
                FieldValue::Text(text) => out.push_str(&format!("{key}: {text}\n")),
                FieldValue::List(items) => {
                    out.push_str(&format!("{key}:\n"));
                    for item in items {
                        out.push_str(&format!("    - {item}\n"));
                    }
                }
                FieldValue::Map(fields) => {
                    out.push_str(&format!("{key}:\n"));
                    for (sub, text) in fields {
                        out.push_str(&format!("    {sub}: {text}\n"));
                    }
                }
            }
        }
        out
    }
}

impl Serialize for Frontmatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// What an indented continuation line attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    /// No key seen yet.
    Nothing,
    /// Key with an empty value, waiting for list items or nested fields.
    Open(String),
    Scalar(String),
    List(String),
    Map(String),
}

impl Pending {
    fn key(&self) -> Option<&str> {
        match self {
            Self::Nothing => None,
            Self::Open(key) | Self::Scalar(key) | Self::List(key) | Self::Map(key) => Some(key),
        }
    }
}

/// Split `raw` into frontmatter and body.
///
/// The header starts with a `---` first line and ends at the next line
/// starting with `---`. Without one, the record is empty and the whole text
/// is body. The returned body is trimmed.
pub fn split_frontmatter(raw: &str) -> (Frontmatter, &str) {
    let Some((header, body)) = locate(raw) else {
        return (Frontmatter::new(), raw);
    };

    let (frontmatter, _) = header
        .lines()
        .fold((Frontmatter::new(), Pending::Nothing), step);

    (frontmatter, body.trim())
}

/// Header text and the remainder after the closing fence line.
fn locate(raw: &str) -> Option<(&str, &str)> {
    let rest = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.starts_with("---") {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}

fn step((mut fm, pending): (Frontmatter, Pending), line: &str) -> (Frontmatter, Pending) {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return (fm, pending);
    }

    if let Some(caps) = LIST_ITEM.captures(line) {
        let Some(key) = pending.key().map(str::to_string) else {
            return (fm, pending);
        };
        let item = trim_quotes(&caps[1]).to_string();
        match fm.get_mut(&key) {
            Some(FieldValue::List(items)) => items.push(item),
            _ => fm.set(key.clone(), FieldValue::List(vec![item])),
        }
        return (fm, Pending::List(key));
    }

    if let Some(caps) = NESTED_FIELD.captures(line) {
        let Some(key) = pending.key().map(str::to_string) else {
            return (fm, pending);
        };
        let sub = caps[1].to_string();
        let value = trim_quotes(caps[2].trim()).to_string();
        if value.is_empty() {
            return (fm, pending);
        }
        match fm.get_mut(&key) {
            Some(FieldValue::Map(fields)) => match fields.iter_mut().find(|(k, _)| *k == sub) {
                Some((_, slot)) => *slot = value,
                None => fields.push((sub, value)),
            },
            _ => fm.set(key.clone(), FieldValue::Map(vec![(sub, value)])),
        }
        return (fm, Pending::Map(key));
    }

    if let Some(caps) = TOP_FIELD.captures(line) {
        let key = caps[1].to_string();
        let value = trim_quotes(caps[2].trim());
        if value.is_empty() {
            fm.set(key.clone(), FieldValue::Null);
            return (fm, Pending::Open(key));
        }
        fm.set(key.clone(), FieldValue::Text(value.to_string()));
        return (fm, Pending::Scalar(key));
    }

    (fm, pending)
}

/// Strip one leading and one trailing quote character.
fn trim_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "---\ntitle: Example\ntags:\n    - alpha\n    - beta\ndate:\n    published: 2024-01-05\n---\n# Example\nBody text.";

    #[test]
    fn test_example_header() {
        let (fm, body) = split_frontmatter(EXAMPLE);
        assert_eq!(fm.title(), Some("Example"));
        assert_eq!(fm.tags(), ["alpha", "beta"]);
        assert_eq!(fm.published(), Some("2024-01-05"));
        assert_eq!(body, "# Example\nBody text.");
        assert_eq!(fm.len(), 3);
    }

    #[test]
    fn test_no_frontmatter_keeps_whole_text() {
        let raw = "# Title\n\ntext";
        let (fm, body) = split_frontmatter(raw);
        assert!(fm.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_unterminated_header_is_body() {
        let raw = "---\ntitle: x\n# no closing";
        let (fm, body) = split_frontmatter(raw);
        assert!(fm.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_empty_value_is_null() {
        let (fm, _) = split_frontmatter("---\nsummary:   \nstatus: draft\n---\n");
        assert_eq!(fm.get("summary"), Some(&FieldValue::Null));
        assert_eq!(fm.status(), Some("draft"));
    }

    #[test]
    fn test_quotes_trimmed() {
        let (fm, _) = split_frontmatter("---\ntitle: \"Quoted: yes\"\ntags:\n  - 'one'\n---\n");
        assert_eq!(fm.title(), Some("Quoted: yes"));
        assert_eq!(fm.tags(), ["one"]);
    }

    #[test]
    fn test_indented_kv_lines_accumulate_as_map() {
        let (fm, _) = split_frontmatter("---\nlinks:\n    repo: github\n    site: example.com\n---\n");
        assert_eq!(
            fm.get("links"),
            Some(&FieldValue::Map(vec![
                ("repo".into(), "github".into()),
                ("site".into(), "example.com".into()),
            ]))
        );
    }

    #[test]
    fn test_list_item_replaces_scalar() {
        let (fm, _) = split_frontmatter("---\ntags: solo\n    - a\n---\n");
        assert_eq!(fm.tags(), ["a"]);
    }

    #[test]
    fn test_orphan_indented_lines_ignored() {
        let (fm, _) = split_frontmatter("---\n    - stray\n    nested: x\nnot a field\ntitle: T\n---\n");
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.title(), Some("T"));
    }

    #[test]
    fn test_scalar_date_counts_as_published() {
        let (fm, _) = split_frontmatter("---\ndate: 2023-03-01\n---\n");
        assert_eq!(fm.published(), Some("2023-03-01"));
    }

    #[test]
    fn test_header_roundtrip() {
        let (fm, _) = split_frontmatter(EXAMPLE);
        let raw = format!("---\n{}---\n", fm.to_header());
        let (again, _) = split_frontmatter(&raw);
        assert_eq!(again, fm);
    }

    #[test]
    fn test_serialize_shapes() {
        let (fm, _) = split_frontmatter(EXAMPLE);
        let json = serde_json::to_string(&fm).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Example","tags":["alpha","beta"],"date":{"published":"2024-01-05"}}"#
        );
    }

    #[test]
    fn test_crlf_header() {
        let (fm, body) = split_frontmatter("---\r\ntitle: Win\r\n---\r\nbody");
        assert_eq!(fm.title(), Some("Win"));
        assert_eq!(body, "body");
    }
}
