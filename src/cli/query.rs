//! `folio query`: list documents through the portfolio filters.
//!
//! ```text
//! folio query --search show:drafts --sort date
//! folio query --category projects --json
//! ```

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::{QueryArgs, discover_project};
use crate::config::FolioConfig;
use crate::content::{Document, FilterOptions, apply_filters};
use crate::log;
use crate::utils::date::{Date, relative_date};

#[derive(Debug, Serialize)]
struct QueryRow<'a> {
    id: &'a str,
    label: &'a str,
    file: &'a str,
    category: Option<&'a str>,
    status: Option<&'a str>,
    published: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relative: Option<String>,
}

impl<'a> QueryRow<'a> {
    fn new(doc: &'a Document, today: Date) -> Self {
        let published = doc.published();
        Self {
            id: &doc.id,
            label: &doc.label,
            file: &doc.file,
            category: doc.category.as_deref(),
            status: doc.frontmatter.status(),
            published,
            relative: published.and_then(|date| relative_date(date, today)),
        }
    }
}

fn filter_options(args: &QueryArgs) -> FilterOptions {
    FilterOptions {
        category: args.category.clone(),
        search: args.search.clone(),
        sort: args.sort,
    }
}

/// Run the query and print matches as a table or JSON.
pub fn run_query(args: &QueryArgs, config: &FolioConfig) -> Result<()> {
    let (_, discovery) = discover_project(config);
    let matches = apply_filters(&discovery.docs, &filter_options(args));
    let today = Date::today();
    let rows: Vec<QueryRow<'_>> = matches.iter().map(|doc| QueryRow::new(doc, today)).collect();

    if args.json {
        let json = serde_json::to_string_pretty(&rows).context("Failed to serialize query results")?;
        println!("{json}");
        return Ok(());
    }

    if rows.is_empty() {
        log!("query"; "no documents match");
        return Ok(());
    }
    for row in &rows {
        println!("{}", format_row(row));
    }
    Ok(())
}

fn format_row(row: &QueryRow<'_>) -> String {
    let mut line = format!("{}  {}", row.id.bold(), row.label);
    if let Some(category) = row.category {
        line.push_str(&format!("  {}", category.cyan()));
    }
    if let Some(status) = row.status {
        line.push_str(&format!("  [{}]", status.yellow()));
    }
    if let Some(relative) = &row.relative {
        line.push_str(&format!("  {}", relative.dimmed()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SortOrder;

    fn doc(path: &str, raw: &str) -> Document {
        Document::from_raw(path, raw.to_string(), "content").unwrap()
    }

    #[test]
    fn test_row_fields() {
        let doc = doc(
            "content/projects/lamp.md",
            "---\ntitle: Lamp\nstatus: draft\ndate: 2026-10-11\n---\n# Lamp\n",
        );
        let row = QueryRow::new(&doc, Date::from_ymd(2026, 10, 18));
        assert_eq!(row.id, "projects-lamp");
        assert_eq!(row.category, Some("projects"));
        assert_eq!(row.status, Some("draft"));
        assert_eq!(row.relative.as_deref(), Some("last week"));

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["published"], "2026-10-11");
    }

    #[test]
    fn test_filter_options_from_args() {
        let args = QueryArgs {
            search: "lamp".into(),
            category: Some("projects".into()),
            sort: SortOrder::Alpha,
            json: true,
        };
        let options = filter_options(&args);
        assert_eq!(options.category.as_deref(), Some("projects"));
        assert_eq!(options.sort, SortOrder::Alpha);
    }

    #[test]
    fn test_format_row_without_date() {
        let doc = doc("content/notes.md", "# Notes\n");
        let row = QueryRow::new(&doc, Date::from_ymd(2026, 1, 1));
        let line = format_row(&row);
        assert!(line.contains("notes"));
        assert!(line.ends_with("  Notes"));
    }
}
