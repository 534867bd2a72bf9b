//! Scatter plot with independent nice axes.

use crate::svg::{self, Element, fmt_value};

use super::scale::{fmt_tick, nice_max, nice_step, ticks};
use super::source::{ChartSource, scatter_points};
use super::theme::{self, DIM, GRID, placeholder};

/// Marker radius, large enough to hover comfortably.
const MARKER_R: f64 = 8.0;

pub fn render_scatter(source: &ChartSource) -> Element {
    let data = scatter_points(source);
    if data.points.is_empty() {
        return placeholder("No data");
    }

    let header_h = theme::header_height(source.title().is_some(), source.description().is_some());
    let width = 600.0;
    let height = 340.0 + header_h;
    let (top, right, bottom, left) = (header_h + 20.0, 36.0, 48.0, 56.0);
    let plot_w = width - left - right;
    let plot_h = height - top - bottom;

    let max_x = nice_max(data.points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max));
    let max_y = nice_max(data.points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max));

    let mut root = svg::root(width, height);
    theme::header(&mut root, source.title(), source.description(), left, 18.0);

    let step_y = nice_step(max_y);
    for tick in ticks(max_y, step_y) {
        let y = top + plot_h - (tick / max_y) * plot_h;
        root.push(
            Element::new("line")
                .attr("x1", left)
                .attr("x2", width - right)
                .attr("y1", y)
                .attr("y2", y)
                .attr("stroke", GRID)
                .attr("stroke-width", 1.0),
        );
        root.push(theme::text(left - 8.0, y + 4.0, fmt_tick(tick, step_y), 11.0, DIM).attr("text-anchor", "end"));
    }
    let step_x = nice_step(max_x);
    for tick in ticks(max_x, step_x) {
        let x = left + (tick / max_x) * plot_w;
        root.push(theme::text(x, height - bottom + 18.0, fmt_tick(tick, step_x), 11.0, DIM));
    }

    for (i, point) in data.points.iter().enumerate() {
        let color = theme::color(i);
        let px = left + (point.x / max_x) * plot_w;
        let py = top + plot_h - (point.y / max_y) * plot_h;
        root.push(
            Element::new("circle")
                .attr("cx", px)
                .attr("cy", py)
                .attr("r", MARKER_R)
                .attr("fill", color)
                .attr("opacity", 0.75)
                .tip(format!(
                    "{}: ({}, {})",
                    point.label,
                    fmt_value(point.x),
                    fmt_value(point.y)
                )),
        );
        if !point.label.is_empty() {
            root.push(theme::text(px, py - 12.0, &point.label, 10.0, color));
        }
    }

    let mid_y = top + plot_h / 2.0;
    root.push(theme::text(left + plot_w / 2.0, height - 10.0, &data.x_label, 11.0, DIM));
    root.push(
        theme::text(10.0, mid_y, &data.y_label, 11.0, DIM)
            .attr("transform", format!("rotate(-90, 10, {})", svg::fmt_num(mid_y))),
    );
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::source::parse_source;

    #[test]
    fn test_scatter_tips() {
        let svg = render_scatter(&parse_source("Size, Speed\n1, 2, alpha\n3.5, 4"));
        assert_eq!(svg.tips(), ["alpha: (1, 2)", ": (3.5, 4)"]);
    }

    #[test]
    fn test_scatter_marker_position() {
        // Axis max 12 on both axes; (12, 12) lands on the top-right corner.
        let svg = render_scatter(&parse_source("x, y\n12, 12"));
        let marker = svg.find_all("circle")[0];
        assert_eq!(marker.num("cx"), Some(564.0));
        assert_eq!(marker.num("cy"), Some(20.0));
        assert_eq!(marker.num("r"), Some(8.0));
    }

    #[test]
    fn test_axis_titles() {
        let svg = render_scatter(&parse_source("Weight, Height\n1, 1"));
        let texts = svg.find_all("text");
        let n = texts.len();
        assert_eq!(texts[n - 2].text_content(), "Weight");
        assert_eq!(texts[n - 1].text_content(), "Height");
        assert!(texts[n - 1].get("transform").unwrap().starts_with("rotate(-90"));
    }

    #[test]
    fn test_no_points() {
        let svg = render_scatter(&parse_source("x, y\nbad, row"));
        assert_eq!(svg.text_content(), "No data");
    }
}
