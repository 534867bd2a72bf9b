//! Inline span parsing.

use std::sync::LazyLock;

use regex::Regex;

use super::block::Inline;

/// Alternatives are tried leftmost-first, so code spans win over emphasis
/// and `**` wins over `*` at the same position.
static SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"`([^`]+)`",
        r"|\*\*([^*]+)\*\*",
        r"|\*([^*]+)\*",
        r"|~~([^~]+)~~",
        r"|==([^=]+)==",
        r"|\[([^\]]+)\]\(([^)]+)\)",
    ))
    .expect("valid regex")
});

/// Parse inline spans in a single line of text.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in SPAN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut out, &text[last..whole.start()]);
        last = whole.end();

        let span = if let Some(code) = caps.get(1) {
            Inline::Code(code.as_str().to_string())
        } else if let Some(inner) = caps.get(2) {
            Inline::Strong(parse_inline(inner.as_str()))
        } else if let Some(inner) = caps.get(3) {
            Inline::Emphasis(parse_inline(inner.as_str()))
        } else if let Some(inner) = caps.get(4) {
            Inline::Strike(parse_inline(inner.as_str()))
        } else if let Some(inner) = caps.get(5) {
            Inline::Highlight(parse_inline(inner.as_str()))
        } else if let (Some(label), Some(href)) = (caps.get(6), caps.get(7)) {
            Inline::Link {
                href: href.as_str().trim().to_string(),
                children: parse_inline(label.as_str()),
            }
        } else {
            continue;
        };
        out.push(span);
    }

    push_text(&mut out, &text[last..]);
    out
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if !text.is_empty() {
        out.push(Inline::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_inline("just words"), vec![text("just words")]);
        assert!(parse_inline("").is_empty());
    }

    #[test]
    fn test_strong_and_emphasis() {
        assert_eq!(
            parse_inline("a **b** *c*"),
            vec![
                text("a "),
                Inline::Strong(vec![text("b")]),
                text(" "),
                Inline::Emphasis(vec![text("c")]),
            ]
        );
    }

    #[test]
    fn test_code_span_is_literal() {
        assert_eq!(
            parse_inline("run `**x**` now"),
            vec![text("run "), Inline::Code("**x**".into()), text(" now")]
        );
    }

    #[test]
    fn test_strike_highlight_link() {
        let spans = parse_inline("~~old~~ ==hot== [docs](/d)");
        assert_eq!(spans[0], Inline::Strike(vec![text("old")]));
        assert_eq!(spans[2], Inline::Highlight(vec![text("hot")]));
        assert_eq!(
            spans[4],
            Inline::Link { href: "/d".into(), children: vec![text("docs")] }
        );
    }

    #[test]
    fn test_nested_link_label() {
        let spans = parse_inline("[`api` ref](x.md)");
        assert_eq!(
            spans,
            vec![Inline::Link {
                href: "x.md".into(),
                children: vec![Inline::Code("api".into()), text(" ref")],
            }]
        );
    }

    #[test]
    fn test_unclosed_markers_stay_text() {
        assert_eq!(parse_inline("2 * 3 = 6"), vec![text("2 * 3 = 6")]);
    }
}
