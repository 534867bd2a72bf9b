//! Vertical, stacked and horizontal bars.

use crate::svg::{self, Element, fmt_value};

use super::frame::{Frame, FrameOptions, LegendStyle, MaxFrom};
use super::scale::nice_max;
use super::source::{ChartSource, parse_number};
use super::theme::{self, DIM, placeholder};

/// Grouped bars, one per series inside each category slot.
pub fn render_bar(source: &ChartSource) -> Element {
    let Some(mut frame) = Frame::new(source, FrameOptions::default()) else {
        return placeholder("No data");
    };

    let n = frame.data.categories.len() as f64;
    let series_count = frame.data.series.len() as f64;
    let group_w = frame.plot_w / n;
    let bar_w = (group_w / (series_count + 1.0)).min(28.0);

    let mut bars = Vec::new();
    for ci in 0..frame.data.categories.len() {
        let cx = frame.pad.left + group_w * ci as f64 + group_w / 2.0;
        for (si, series) in frame.data.series.iter().enumerate() {
            let value = series.value(ci);
            let h = frame.scale(value);
            bars.push(
                Element::new("rect")
                    .attr("x", cx - (series_count * bar_w) / 2.0 + si as f64 * bar_w + 1.0)
                    .attr("y", frame.base_y - h)
                    .attr("width", bar_w - 2.0)
                    .attr("height", h)
                    .attr("rx", 2.0)
                    .attr("fill", theme::color(si))
                    .attr("opacity", 0.85)
                    .tip(format!("{}: {}", series.label, fmt_value(value))),
            );
        }
    }

    frame.root.children.extend(bars.into_iter().map(svg::Node::Element));
    frame.legend(LegendStyle::Swatch);
    frame.root
}

/// Series stacked bottom-up within each category; only the top segment is
/// rounded.
pub fn render_stacked(source: &ChartSource) -> Element {
    let opts = FrameOptions {
        max_from: MaxFrom::Totals,
        ..FrameOptions::default()
    };
    let Some(mut frame) = Frame::new(source, opts) else {
        return placeholder("No data");
    };

    let n = frame.data.categories.len() as f64;
    let slot_w = frame.plot_w / n;
    let bar_w = (slot_w * 0.5).min(40.0);
    let last = frame.data.series.len() - 1;

    let mut bars = Vec::new();
    for ci in 0..frame.data.categories.len() {
        let cx = frame.pad.left + slot_w * ci as f64 + slot_w / 2.0;
        let mut stacked = 0.0;
        for (si, series) in frame.data.series.iter().enumerate() {
            let value = series.value(ci);
            let h = frame.scale(value);
            bars.push(
                Element::new("rect")
                    .attr("x", cx - bar_w / 2.0)
                    .attr("y", frame.base_y - stacked - h)
                    .attr("width", bar_w)
                    .attr("height", h)
                    .attr("rx", if si == last { 2.0 } else { 0.0 })
                    .attr("fill", theme::color(si))
                    .attr("opacity", 0.85)
                    .tip(format!("{}: {}", series.label, fmt_value(value))),
            );
            stacked += h;
        }
    }

    frame.root.children.extend(bars.into_iter().map(svg::Node::Element));
    frame.legend(LegendStyle::Swatch);
    frame.root
}

/// One bar per row, labels on the left and values past the bar end. The
/// canvas grows with the row count.
pub fn render_hbar(source: &ChartSource) -> Element {
    let rows = &source.rows;
    if rows.is_empty() {
        return placeholder("No data");
    }

    let header_h = theme::header_height(source.title().is_some(), source.description().is_some());
    let width = 600.0;
    let height = (rows.len() as f64 * 50.0 + header_h + 36.0).max(240.0);
    let (top, right, bottom, left) = (header_h + 20.0, 40.0, 16.0, 130.0);
    let plot_w = width - left - right;
    let plot_h = height - top - bottom;
    let row_h = plot_h / rows.len() as f64;
    let bar_h = (row_h - 8.0).min(32.0);
    let values: Vec<f64> = rows
        .iter()
        .map(|row| row.get(1).and_then(|c| parse_number(c)).unwrap_or(0.0))
        .collect();
    let max = nice_max(values.iter().copied().fold(f64::NEG_INFINITY, f64::max));

    let mut root = svg::root(width, height);
    theme::header(&mut root, source.title(), source.description(), left, 18.0);

    for (i, (row, value)) in rows.iter().zip(&values).enumerate() {
        let label = row.first().map(String::as_str).unwrap_or_default();
        let y = top + row_h * i as f64 + (row_h - bar_h) / 2.0;
        let w = (value / max) * plot_w;
        let mid = y + bar_h / 2.0 + 1.0;

        root.push(
            theme::text(left - 8.0, mid, label, 11.0, DIM)
                .attr("text-anchor", "end")
                .attr("dominant-baseline", "middle"),
        );
        root.push(
            Element::new("rect")
                .attr("x", left)
                .attr("y", y)
                .attr("width", w)
                .attr("height", bar_h)
                .attr("rx", 3.0)
                .attr("fill", theme::color(i))
                .attr("opacity", 0.85)
                .tip(format!("{label}: {}", fmt_value(*value))),
        );
        root.push(
            theme::text(left + w + 8.0, mid, fmt_value(*value), 11.0, DIM)
                .attr("text-anchor", "start")
                .attr("dominant-baseline", "middle"),
        );
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::source::parse_source;

    #[test]
    fn test_bar_tips_and_legend() {
        let svg = render_bar(&parse_source(",a,b,c\nSales,3,47,12"));
        assert_eq!(svg.tips(), ["Sales: 3", "Sales: 47", "Sales: 12"]);
        // Bars plus one legend swatch.
        assert_eq!(svg.find_all("rect").len(), 4);
    }

    #[test]
    fn test_bar_heights_scale_to_axis() {
        let svg = render_bar(&parse_source(",a\ns,50"));
        let bar = svg.find_all("rect")[0];
        assert_eq!(bar.num("height"), Some(280.0));
        assert_eq!(bar.num("y"), Some(20.0));
    }

    #[test]
    fn test_bar_width_capped() {
        let svg = render_bar(&parse_source(",a\ns,1"));
        assert_eq!(svg.find_all("rect")[0].num("width"), Some(26.0));
    }

    #[test]
    fn test_bar_empty() {
        let svg = render_bar(&parse_source(""));
        assert_eq!(svg.text_content(), "No data");
    }

    #[test]
    fn test_stacked_rounds_top_only() {
        let svg = render_stacked(&parse_source(",a\nx,10\ny,20"));
        let rects: Vec<_> = svg.tips();
        assert_eq!(rects, ["x: 10", "y: 20"]);
        let bars = svg.find_all("rect");
        assert_eq!(bars[0].get("rx"), Some("0"));
        assert_eq!(bars[1].get("rx"), Some("2"));
        // Second segment starts where the first ends.
        let first_top = bars[0].num("y").unwrap();
        let second_bottom = bars[1].num("y").unwrap() + bars[1].num("height").unwrap();
        assert!((first_top - second_bottom).abs() < 0.02);
    }

    #[test]
    fn test_hbar_grows_with_rows() {
        let few = render_hbar(&parse_source("Name, Score\na, 1\nb, 2"));
        assert_eq!(svg::view_box(&few), Some((600.0, 240.0)));

        let source: String = std::iter::once("Name, Score".to_string())
            .chain((0..8).map(|i| format!("row{i}, {i}")))
            .collect::<Vec<_>>()
            .join("\n");
        let many = render_hbar(&parse_source(&source));
        assert_eq!(svg::view_box(&many), Some((600.0, 436.0)));
    }

    #[test]
    fn test_hbar_tips() {
        let svg = render_hbar(&parse_source("Name, Score\nRust, 9.5\nGo, x"));
        assert_eq!(svg.tips(), ["Rust: 9.5", "Go: 0"]);
    }
}
