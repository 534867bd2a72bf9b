//! Body text to blocks.
//!
//! The body runs through a fixed sequence of passes. Each pass only looks at
//! the text the previous passes left behind, so a fenced block that became a
//! figure is never seen by the heading or list passes.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::block::{Block, Direction, Figure, Inline, Media, Prototype};
use super::inline::parse_inline;
use super::resolve::resolve;

static PROTOTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"::prototype\{([^}]+)\}").expect("valid regex"));
static ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)=["']([^"']+)["']"#).expect("valid regex"));
static TITLED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(([^)\s]+)\s+"([^"]+)"\)"#).expect("valid regex")
});
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("valid regex"));
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([\w-]*)[ \t]*([^\n]*)\n(.*?)```").expect("valid regex")
});
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,3}) (.+)$").expect("valid regex"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\* (.+)$").expect("valid regex"));
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\. (.+)$").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("valid regex"));

const DEFAULT_PROTOTYPE_HEIGHT: &str = "300";

/// Intermediate state between passes.
#[derive(Debug)]
enum Segment {
    Text(String),
    Block(Block),
}

/// Parse a body into blocks. Relative media URLs resolve against `base_dir`.
pub fn parse_body(body: &str, base_dir: &str) -> Vec<Block> {
    let segments = vec![Segment::Text(body.to_string())];
    let segments = split_matches(segments, &PROTOTYPE, |caps| prototype(caps, base_dir));
    let segments = split_matches(segments, &TITLED_IMAGE, |caps| image(caps, base_dir));
    let segments = split_matches(segments, &IMAGE, |caps| image(caps, base_dir));
    let segments = split_matches(segments, &FENCE, fence);
    let segments = split_lines(segments, quotes);
    let segments = split_lines(segments, headings);
    let segments = split_lines(segments, lists);

    segments
        .into_iter()
        .flat_map(|segment| match segment {
            Segment::Block(block) => vec![block],
            Segment::Text(text) => paragraphs(&text),
        })
        .collect()
}

// ============================================================================
// Pattern passes
// ============================================================================

/// Replace every match of `re` inside text segments with a block.
fn split_matches(
    segments: Vec<Segment>,
    re: &Regex,
    build: impl Fn(&Captures) -> Block,
) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        let Segment::Text(text) = segment else {
            out.push(segment);
            continue;
        };
        let mut last = 0;
        for caps in re.captures_iter(&text) {
            let Some(whole) = caps.get(0) else { continue };
            push_text(&mut out, &text[last..whole.start()]);
            out.push(Segment::Block(build(&caps)));
            last = whole.end();
        }
        push_text(&mut out, &text[last..]);
    }
    out
}

fn push_text(out: &mut Vec<Segment>, text: &str) {
    if !text.trim().is_empty() {
        out.push(Segment::Text(text.to_string()));
    }
}

fn prototype(caps: &Captures, base_dir: &str) -> Block {
    let mut proto = Prototype {
        src: String::new(),
        height: DEFAULT_PROTOTYPE_HEIGHT.to_string(),
        caption: None,
        bg: None,
    };
    for attr in ATTR.captures_iter(&caps[1]) {
        let value = attr[2].to_string();
        match &attr[1] {
            "src" => proto.src = resolve(&value, base_dir),
            "height" => proto.height = value,
            "caption" => proto.caption = Some(value),
            "bg" => proto.bg = Some(value),
            _ => {}
        }
    }
    figure(Media::Prototype(proto))
}

fn image(caps: &Captures, base_dir: &str) -> Block {
    figure(Media::Image {
        src: resolve(caps[2].trim(), base_dir),
        alt: caps[1].to_string(),
        fit: caps.get(3).map(|title| title.as_str().to_string()),
    })
}

fn fence(caps: &Captures) -> Block {
    let lang = &caps[1];
    let option = caps[2].trim();
    let content = &caps[3];

    if let Some(kind) = lang.strip_prefix("chart-") {
        return figure(Media::Chart {
            kind: kind.to_string(),
            source: collapse_blank_lines(content),
        });
    }
    if lang == "chart" {
        return figure(Media::Chart {
            kind: String::new(),
            source: collapse_blank_lines(content),
        });
    }
    if lang == "flow" {
        return figure(Media::Diagram {
            direction: option.split_whitespace().next().and_then(Direction::from_token),
            source: collapse_blank_lines(content),
        });
    }

    figure(Media::Code {
        lang: (!lang.is_empty()).then(|| lang.to_string()),
        code: content.trim().to_string(),
    })
}

/// Chart and diagram sources must stay one block of text.
fn collapse_blank_lines(source: &str) -> String {
    source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn figure(media: Media) -> Block {
    Block::Figure(Figure::new(media))
}

// ============================================================================
// Line passes
// ============================================================================

/// Run a line-oriented pass over every text segment.
fn split_lines(segments: Vec<Segment>, pass: fn(&str) -> Vec<Segment>) -> Vec<Segment> {
    segments
        .into_iter()
        .flat_map(|segment| match segment {
            Segment::Text(text) => pass(&text),
            block => vec![block],
        })
        .collect()
}

/// Accumulates plain lines until a block interrupts them.
#[derive(Default)]
struct LineBuffer {
    out: Vec<Segment>,
    text: Vec<String>,
}

impl LineBuffer {
    fn line(&mut self, line: &str) {
        self.text.push(line.to_string());
    }

    fn block(&mut self, block: Block) {
        self.flush();
        self.out.push(Segment::Block(block));
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = self.text.join("\n");
            self.text.clear();
            push_text(&mut self.out, &text);
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        self.flush();
        self.out
    }
}

fn quotes(text: &str) -> Vec<Segment> {
    let mut buf = LineBuffer::default();
    let mut run: Vec<Vec<Inline>> = Vec::new();
    let mut in_run = false;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix('>') {
            in_run = true;
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            if !rest.trim().is_empty() {
                run.push(parse_inline(rest.trim_end()));
            }
            continue;
        }
        if in_run {
            in_run = false;
            close_quote(&mut buf, &mut run);
        }
        buf.line(line);
    }
    if in_run {
        close_quote(&mut buf, &mut run);
    }
    buf.finish()
}

fn close_quote(buf: &mut LineBuffer, run: &mut Vec<Vec<Inline>>) {
    let lines = std::mem::take(run);
    if !lines.is_empty() {
        buf.block(figure(Media::Quote { lines }));
    } else {
        buf.flush();
    }
}

fn headings(text: &str) -> Vec<Segment> {
    let mut buf = LineBuffer::default();
    for line in text.lines() {
        match HEADING.captures(line.trim_end()) {
            Some(caps) => buf.block(Block::Heading {
                level: caps[1].len() as u8,
                content: parse_inline(caps[2].trim()),
            }),
            None => buf.line(line),
        }
    }
    buf.finish()
}

fn lists(text: &str) -> Vec<Segment> {
    let mut buf = LineBuffer::default();
    let mut items: Vec<Vec<Inline>> = Vec::new();
    let mut ordered = false;

    for line in text.lines() {
        let line_trimmed = line.trim_end();
        let item = BULLET
            .captures(line_trimmed)
            .map(|caps| (false, caps))
            .or_else(|| NUMBERED.captures(line_trimmed).map(|caps| (true, caps)));

        match item {
            Some((kind, caps)) => {
                if !items.is_empty() && kind != ordered {
                    close_list(&mut buf, &mut items, ordered);
                }
                ordered = kind;
                items.push(parse_inline(caps[1].trim()));
            }
            None => {
                close_list(&mut buf, &mut items, ordered);
                buf.line(line);
            }
        }
    }
    close_list(&mut buf, &mut items, ordered);
    buf.finish()
}

fn close_list(buf: &mut LineBuffer, items: &mut Vec<Vec<Inline>>, ordered: bool) {
    if !items.is_empty() {
        let items = std::mem::take(items);
        buf.block(Block::List { ordered, items });
    }
}

// ============================================================================
// Paragraphs
// ============================================================================

/// Split leftover text on blank lines. Chunks that open with a tag pass
/// through as raw markup.
fn paragraphs(text: &str) -> Vec<Block> {
    BLANK_LINES
        .split(text)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            if chunk.starts_with('<') {
                return Block::Html { raw: chunk.to_string() };
            }
            let mut content = Vec::new();
            for (i, line) in chunk.lines().map(str::trim).enumerate() {
                if i > 0 {
                    content.push(Inline::Break);
                }
                content.extend(parse_inline(line));
            }
            Block::Paragraph { content }
        })
        .collect()
}
