//! Flow diagram engine.
//!
//! [`parse`] turns diagram text into nodes and edges, [`layout`] sizes the
//! nodes and hands them to a [`LayoutEngine`], and [`render_svg`] draws the
//! positioned graph. [`render_diagram`] runs all three.

mod labels;
pub mod layout;
mod parse;
mod shape;

use crate::icons;
use crate::markdown::Direction;
use crate::svg::{self, Element, measure_text};

pub use labels::{LabelBox, resolve_collisions};
pub use layout::{
    EdgeRoute, LayeredLayout, LayoutEdge, LayoutEngine, LayoutError, LayoutInput, LayoutNode,
    LayoutOptions, LayoutOutput, Point,
};
pub use parse::{DiagramEdge, DiagramNode, DiagramSource, Shape, parse};
pub use shape::{edge_path, shape_path};

// ============================================================================
// Constants
// ============================================================================

const FONT_SIZE: f64 = 12.0;
const EDGE_FONT_SIZE: f64 = 10.0;
const PAD_X: f64 = 16.0;
const PAD_Y: f64 = 10.0;
const MIN_W: f64 = 72.0;
const RANK_SEP: f64 = 56.0;
const NODE_SEP: f64 = 36.0;
const MARGIN: f64 = 24.0;
const ICON_SIZE: f64 = 14.0;
const ICON_GAP: f64 = 5.0;
const TITLE_OFFSET: f64 = 28.0;

const FG: &str = "var(--fc-fg, #1a1a1a)";
const DIM: &str = "var(--fc-dim, #999)";
const BG: &str = "var(--fc-bg, #fafaf8)";
const NODE_FILL: &str = "var(--fc-node-fill, #fff)";
const NODE_STROKE: &str = "var(--fc-node-stroke, #bbb)";
const EDGE_STROKE: &str = "var(--fc-edge-stroke, #bbb)";
const FONT: &str = "var(--fc-font, system-ui, sans-serif)";
const MONO: &str = "var(--fc-mono, monospace)";

/// Id of the shared arrowhead marker.
pub const ARROW_ID: &str = "fc-arrow";

// ============================================================================
// Layout
// ============================================================================

/// A diagram with positions from a layout engine.
#[derive(Debug, Clone)]
pub struct LaidOut<'a> {
    pub source: &'a DiagramSource,
    pub direction: Direction,
    pub output: LayoutOutput,
}

/// Box size of a node: measured label plus icon allowance and padding.
pub fn node_size(node: &DiagramNode) -> (f64, f64) {
    let icon_extra = if known_icon(node).is_some() {
        ICON_SIZE + ICON_GAP
    } else {
        0.0
    };
    let text_w = measure_text(&node.label, FONT_SIZE);
    let width = MIN_W.max(text_w + icon_extra + PAD_X * 2.0);
    (width, FONT_SIZE + PAD_Y * 2.0)
}

/// Label plate size of an edge label.
pub fn edge_label_size(label: &str) -> (f64, f64) {
    (measure_text(label, EDGE_FONT_SIZE) + 12.0, EDGE_FONT_SIZE + 8.0)
}

fn known_icon(node: &DiagramNode) -> Option<&'static str> {
    node.icon.as_deref().and_then(icons::icon)
}

/// Size every node and edge label and run `engine`.
///
/// The direction comes from `direction` when given, then `dir:` metadata,
/// then top-to-bottom.
pub fn layout<'a>(
    source: &'a DiagramSource,
    direction: Option<Direction>,
    engine: &dyn LayoutEngine,
) -> Result<LaidOut<'a>, LayoutError> {
    let direction = direction.or_else(|| source.direction()).unwrap_or_default();

    let input = LayoutInput {
        nodes: source
            .nodes
            .iter()
            .map(|node| {
                let (width, height) = node_size(node);
                LayoutNode {
                    id: node.label.clone(),
                    width,
                    height,
                }
            })
            .collect(),
        edges: source
            .edges
            .iter()
            .map(|edge| LayoutEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
                label: (!edge.label.is_empty()).then(|| edge_label_size(&edge.label)),
            })
            .collect(),
    };
    let options = LayoutOptions {
        direction,
        rank_sep: RANK_SEP,
        node_sep: NODE_SEP,
        margin: MARGIN,
    };

    let output = engine.layout(&input, &options)?;
    if output.nodes.len() != input.nodes.len() || output.edges.len() != input.edges.len() {
        return Err(LayoutError::Engine(format!(
            "expected {} nodes and {} edges, got {} and {}",
            input.nodes.len(),
            input.edges.len(),
            output.nodes.len(),
            output.edges.len()
        )));
    }

    Ok(LaidOut {
        source,
        direction,
        output,
    })
}

// ============================================================================
// Rendering
// ============================================================================

fn text(x: f64, y: f64, content: &str, size: f64, fill: &str) -> Element {
    Element::new("text")
        .attr("x", x)
        .attr("y", y)
        .attr("fill", fill)
        .attr("font-family", FONT)
        .attr("font-size", size)
        .attr("text-anchor", "middle")
        .attr("dominant-baseline", "central")
        .text(content)
}

fn arrow_defs() -> Element {
    let marker = Element::new("marker")
        .attr("id", ARROW_ID)
        .attr("viewBox", "0 0 10 10")
        .attr("refX", 9.0)
        .attr("refY", 5.0)
        .attr("markerWidth", 7.0)
        .attr("markerHeight", 7.0)
        .attr("orient", "auto-start-reverse")
        .child(
            Element::new("path")
                .attr("d", "M0,1.5L9,5L0,8.5z")
                .attr("fill", EDGE_STROKE),
        );
    Element::new("defs").child(marker)
}

/// Draw a laid-out diagram.
///
/// Edges are drawn first, then label plates, then nodes, each in
/// declaration order.
pub fn render_svg(laid: &LaidOut<'_>) -> Element {
    let source = laid.source;
    let out = &laid.output;
    let title = source.title();
    let offset = if title.is_some() { TITLE_OFFSET } else { 0.0 };

    let mut root = svg::root(out.width, out.height + offset);
    root.push(arrow_defs());

    if let Some(title) = title {
        root.push(
            text(MARGIN, 16.0, title, 11.0, FG)
                .attr("text-anchor", "start")
                .attr("font-family", MONO)
                .attr("opacity", 0.5),
        );
    }

    let mut main = Element::new("g");
    if offset > 0.0 {
        main.set("transform", format!("translate(0,{})", svg::fmt_num(offset)));
    }

    for (edge, route) in source.edges.iter().zip(&out.edges) {
        let d = edge_path(&route.points);
        if d.is_empty() {
            continue;
        }
        let tip = if edge.label.is_empty() {
            format!("{} -> {}", edge.from, edge.to)
        } else {
            format!("{} -> {}: {}", edge.from, edge.to, edge.label)
        };
        main.push(
            Element::new("path")
                .attr("d", d)
                .attr("fill", "none")
                .attr("stroke", EDGE_STROKE)
                .attr("stroke-width", 1.25)
                .attr("stroke-linecap", "round")
                .attr("marker-end", format!("url(#{ARROW_ID})"))
                .attr("data-from", &edge.from)
                .attr("data-to", &edge.to)
                .tip(tip),
        );
    }

    let mut plates: Vec<LabelBox> = source
        .edges
        .iter()
        .zip(&out.edges)
        .filter(|(edge, _)| !edge.label.is_empty())
        .filter_map(|(edge, route)| {
            let anchor = route.label?;
            let (w, h) = edge_label_size(&edge.label);
            Some(LabelBox {
                text: edge.label.clone(),
                x: anchor.x,
                y: anchor.y,
                w,
                h,
            })
        })
        .collect();
    resolve_collisions(&mut plates);

    for plate in &plates {
        main.push(
            Element::new("rect")
                .attr("x", plate.x - plate.w / 2.0)
                .attr("y", plate.y - plate.h / 2.0)
                .attr("width", plate.w)
                .attr("height", plate.h)
                .attr("rx", 3.0)
                .attr("fill", BG)
                .attr("stroke", EDGE_STROKE)
                .attr("stroke-width", 0.5)
                .attr("opacity", 0.9),
        );
        main.push(text(plate.x, plate.y, &plate.text, EDGE_FONT_SIZE, DIM).attr("font-style", "italic"));
    }

    for (node, center) in source.nodes.iter().zip(&out.nodes) {
        let (w, h) = node_size(node);
        main.push(
            Element::new("path")
                .attr("d", shape_path(node.shape, center.x, center.y, w, h))
                .attr("fill", NODE_FILL)
                .attr("stroke", NODE_STROKE)
                .attr("stroke-width", 1.25)
                .attr("data-shape", node.shape.as_str())
                .tip(&node.label),
        );

        match known_icon(node) {
            Some(path) => {
                let text_w = measure_text(&node.label, FONT_SIZE);
                let total = text_w + ICON_SIZE + ICON_GAP;
                let ix = center.x - total / 2.0;
                let iy = center.y - ICON_SIZE / 2.0;
                main.push(
                    Element::new("g")
                        .attr(
                            "transform",
                            format!("translate({},{})", svg::fmt_num(ix), svg::fmt_num(iy)),
                        )
                        .child(
                            Element::new("path")
                                .attr("d", path)
                                .attr("fill", FG)
                                .attr("fill-rule", "evenodd")
                                .attr("opacity", 0.55),
                        ),
                );
                let tx = ix + ICON_SIZE + ICON_GAP + text_w / 2.0;
                main.push(text(tx, center.y, &node.label, FONT_SIZE, FG));
            }
            None => main.push(text(center.x, center.y, &node.label, FONT_SIZE, FG)),
        }
    }

    root.push(main);
    root
}

/// Placeholder for a diagram without nodes.
pub fn placeholder() -> Element {
    Element::new("svg")
        .attr("xmlns", svg::NS)
        .attr("viewBox", "0 0 200 50")
        .attr("data-placeholder", "true")
        .child(
            Element::new("text")
                .attr("x", 100.0)
                .attr("y", 25.0)
                .attr("text-anchor", "middle")
                .attr("font-size", 12.0)
                .attr("fill", "#999")
                .text("No nodes defined"),
        )
}

/// Parse, lay out and draw diagram text.
///
/// A source without nodes renders [`placeholder`]; only the layout engine
/// can fail.
pub fn render_diagram(
    text: &str,
    direction: Option<Direction>,
    engine: &dyn LayoutEngine,
) -> Result<Element, LayoutError> {
    let source = parse(text);
    if source.nodes.is_empty() {
        return Ok(placeholder());
    }
    let laid = layout(&source, direction, engine)?;
    Ok(render_svg(&laid))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl LayoutEngine for Failing {
        fn layout(&self, _: &LayoutInput, _: &LayoutOptions) -> Result<LayoutOutput, LayoutError> {
            Err(LayoutError::Engine("offline".into()))
        }
    }

    fn draw(text: &str) -> Element {
        render_diagram(text, None, &LayeredLayout::default()).unwrap()
    }

    #[test]
    fn test_node_size() {
        let short = DiagramNode {
            label: "a".into(),
            shape: Shape::RoundRect,
            icon: None,
        };
        assert_eq!(node_size(&short), (72.0, 32.0));

        let long = DiagramNode {
            label: "a much longer node label".into(),
            ..short.clone()
        };
        let with_icon = DiagramNode {
            icon: Some("database".into()),
            ..long.clone()
        };
        let unknown_icon = DiagramNode {
            icon: Some("no-such-icon".into()),
            ..long.clone()
        };
        let extra = node_size(&with_icon).0 - node_size(&long).0;
        assert!((extra - (ICON_SIZE + ICON_GAP)).abs() < 1e-9);
        assert_eq!(node_size(&unknown_icon), node_size(&long));
    }

    #[test]
    fn test_empty_source_placeholder() {
        let svg = draw("title: nothing here");
        assert_eq!(svg.get("viewBox"), Some("0 0 200 50"));
        assert_eq!(svg.text_content(), "No nodes defined");
    }

    #[test]
    fn test_edges_in_declaration_order() {
        let svg = draw("[a] [b]\n[b] [c]\n[a] [c]");
        let pairs: Vec<(&str, &str)> = svg
            .find_all("path")
            .into_iter()
            .filter_map(|p| Some((p.get("data-from")?, p.get("data-to")?)))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("b", "c"), ("a", "c")]);
        for path in svg.find_all("path").into_iter().filter(|p| p.get("data-from").is_some()) {
            assert_eq!(path.get("marker-end"), Some("url(#fc-arrow)"));
        }
    }

    #[test]
    fn test_one_shape_per_node() {
        let svg = draw("[<diamond> check] -> yes -> [done]\n[<rect> check] [retry]");
        let shapes: Vec<&str> = svg
            .find_all("path")
            .into_iter()
            .filter_map(|p| p.get("data-shape"))
            .collect();
        assert_eq!(shapes, vec!["diamond", "roundrect", "roundrect"]);
    }

    #[test]
    fn test_edge_label_plate() {
        let svg = draw("[a] -> calls -> [b]");
        let plates = svg.find_all("rect");
        assert_eq!(plates.len(), 1);
        assert_eq!(plates[0].get("rx"), Some("3"));
        assert!(svg.tips().contains(&"a -> b: calls"));
    }

    #[test]
    fn test_title_offsets_drawing() {
        let plain = draw("[a] [b]");
        let titled = draw("# Flow\n[a] [b]");
        let (_, h_plain) = svg::view_box(&plain).unwrap();
        let (_, h_titled) = svg::view_box(&titled).unwrap();
        assert_eq!(h_titled - h_plain, TITLE_OFFSET);

        let group = titled.find_all("g").into_iter().find(|g| g.get("transform").is_some());
        assert_eq!(group.and_then(|g| g.get("transform")), Some("translate(0,28)"));
    }

    #[test]
    fn test_direction_override() {
        let source = parse("dir: LR\n[a] [b]");
        let engine = LayeredLayout::default();
        assert_eq!(layout(&source, None, &engine).unwrap().direction, Direction::LeftToRight);
        assert_eq!(
            layout(&source, Some(Direction::TopToBottom), &engine).unwrap().direction,
            Direction::TopToBottom
        );
    }

    #[test]
    fn test_layout_failure_surfaces() {
        assert!(render_diagram("[a] [b]", None, &Failing).is_err());
        // No nodes means the engine is never consulted.
        assert!(render_diagram("", None, &Failing).is_ok());
    }

    #[test]
    fn test_icon_rendered_in_group() {
        let svg = draw("[<icon:database> store]");
        let groups: Vec<_> = svg
            .find_all("g")
            .into_iter()
            .filter(|g| g.get("transform").is_some_and(|t| t.starts_with("translate(")))
            .collect();
        assert_eq!(groups.len(), 1);
    }
}
