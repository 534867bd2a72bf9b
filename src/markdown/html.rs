//! Block tree to reading-surface markup.
//!
//! Every media figure becomes `<figure data-media data-type="...">`, the
//! element the scroll-sync surface anchors on. Chart and diagram figures
//! carry their rendered SVG once hydrated, and their escaped source until
//! then.

use crate::utils::html::{escape_attr, escape_text};

use super::block::{Block, Figure, Inline, Media, Rendered};

/// Render a block list to an HTML fragment.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        render_block(block, &mut out);
        out.push('\n');
    }
    out
}

fn render_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            out.push_str(&format!("<h{level}>"));
            render_inline(content, out);
            out.push_str(&format!("</h{level}>"));
        }
        Block::Paragraph { content } => {
            out.push_str("<p>");
            render_inline(content, out);
            out.push_str("</p>");
        }
        Block::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{tag}>"));
            for item in items {
                out.push_str("<li>");
                render_inline(item, out);
                out.push_str("</li>");
            }
            out.push_str(&format!("</{tag}>"));
        }
        Block::Html { raw } => out.push_str(raw),
        Block::Figure(figure) => render_figure(figure, out),
    }
}

/// Markup for one figure, also used to fill the companion slot.
pub fn render_figure(figure: &Figure, out: &mut String) {
    let kind = figure.kind().as_str();
    let hydrated = if figure.is_hydrated() { " data-hydrated" } else { "" };
    out.push_str(&format!("<figure data-media data-type=\"{kind}\"{hydrated}"));

    match &figure.media {
        Media::Image { src, alt, fit } => {
            if let Some(fit) = fit {
                out.push_str(&format!(" data-fit=\"{}\"", escape_attr(fit)));
            }
            out.push_str(&format!(
                "><img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                escape_attr(src),
                escape_attr(alt)
            ));
            if !alt.is_empty() {
                out.push_str(&format!("<figcaption>{}</figcaption>", escape_text(alt)));
            }
        }
        Media::Code { lang, code } => {
            let lang = lang.as_deref().unwrap_or("");
            out.push_str(&format!(
                " data-lang=\"{}\"><pre><code>{}</code></pre>",
                escape_attr(lang),
                escape_text(code)
            ));
        }
        Media::Quote { lines } => {
            out.push_str("><blockquote>");
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    out.push_str("<br>");
                }
                render_inline(line, out);
            }
            out.push_str("</blockquote>");
        }
        Media::Chart { kind, source } => {
            out.push_str(&format!(" data-chart=\"{}\">", escape_attr(kind)));
            render_hydratable(figure, "fc-chart", &format!("language-chart-{kind}"), source, out);
        }
        Media::Diagram { direction, source } => {
            if let Some(direction) = direction {
                out.push_str(&format!(" data-dir=\"{}\"", direction.as_str()));
            }
            out.push('>');
            render_hydratable(figure, "fc-diagram", "language-flow", source, out);
        }
        Media::Prototype(proto) => {
            out.push_str(&format!(
                "><iframe src=\"{}\" height=\"{}\" sandbox=\"allow-scripts\" loading=\"lazy\"",
                escape_attr(&proto.src),
                escape_attr(&proto.height)
            ));
            if let Some(bg) = &proto.bg {
                out.push_str(&format!(" style=\"background:{}\"", escape_attr(bg)));
            }
            out.push_str("></iframe>");
            if let Some(caption) = &proto.caption {
                out.push_str(&format!("<figcaption>{}</figcaption>", escape_text(caption)));
            }
        }
    }

    out.push_str("</figure>");
}

fn render_hydratable(figure: &Figure, class: &str, lang: &str, source: &str, out: &mut String) {
    match &figure.rendered {
        Some(Rendered::Svg(svg)) => out.push_str(&format!("<div class=\"{class}\">{svg}</div>")),
        Some(Rendered::Fallback) | None => out.push_str(&format!(
            "<pre><code class=\"{}\">{}</code></pre>",
            escape_attr(lang),
            escape_text(source)
        )),
    }
}

fn render_inline(spans: &[Inline], out: &mut String) {
    for span in spans {
        match span {
            Inline::Text(text) => out.push_str(&escape_text(text)),
            Inline::Strong(children) => wrap("strong", children, out),
            Inline::Emphasis(children) => wrap("em", children, out),
            Inline::Strike(children) => wrap("del", children, out),
            Inline::Highlight(children) => wrap("mark", children, out),
            Inline::Code(code) => out.push_str(&format!("<code>{}</code>", escape_text(code))),
            Inline::Link { href, children } => {
                out.push_str(&format!("<a href=\"{}\">", escape_attr(href)));
                render_inline(children, out);
                out.push_str("</a>");
            }
            Inline::Break => out.push_str("<br>"),
        }
    }
}

fn wrap(tag: &str, children: &[Inline], out: &mut String) {
    out.push_str(&format!("<{tag}>"));
    render_inline(children, out);
    out.push_str(&format!("</{tag}>"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse;

    #[test]
    fn test_paragraph_inline_markup() {
        let doc = parse("a **b** `<c>` [d](/e)");
        assert_eq!(
            render_blocks(&doc.blocks),
            "<p>a <strong>b</strong> <code>&lt;c&gt;</code> <a href=\"/e\">d</a></p>\n"
        );
    }

    #[test]
    fn test_code_figure_escapes_content() {
        let doc = parse("```html\n<b>&amp;</b>\n```");
        let html = render_blocks(&doc.blocks);
        assert!(html.contains("data-type=\"code\""));
        assert!(html.contains("data-lang=\"html\""));
        assert!(html.contains("&lt;b&gt;&amp;amp;&lt;/b&gt;"));
    }

    #[test]
    fn test_pending_chart_shows_source() {
        let doc = parse("```chart-pie\nA,1\n```");
        let html = render_blocks(&doc.blocks);
        assert!(html.contains("data-type=\"chart\" data-chart=\"pie\">"));
        assert!(html.contains("<code class=\"language-chart-pie\">A,1</code>"));
        assert!(!html.contains("data-hydrated"));
    }

    #[test]
    fn test_hydrated_diagram_embeds_svg() {
        let mut doc = parse("```flow\n[a] [b]\n```");
        if let Some(fig) = doc.figures_mut().next() {
            fig.rendered = Some(Rendered::Svg("<svg/>".into()));
        }
        let html = render_blocks(&doc.blocks);
        assert!(html.contains("data-hydrated"));
        assert!(html.contains("<div class=\"fc-diagram\"><svg/></div>"));
    }

    #[test]
    fn test_prototype_iframe() {
        let doc = parse("::prototype{src=\"p.html\" height=\"420\" caption=\"Demo\"}");
        let html = render_blocks(&doc.blocks);
        assert!(html.contains("<iframe src=\"p.html\" height=\"420\""));
        assert!(html.contains("<figcaption>Demo</figcaption>"));
    }
}
