//! Line and area charts.

use crate::svg::{self, Element, fmt_num, fmt_value};

use super::frame::{Frame, FrameOptions, LegendStyle};
use super::source::ChartSource;
use super::theme::{self, BG, placeholder};

type Pt = (f64, f64, f64);

/// Smooth curve through `pts`: each segment is a cubic whose control
/// points share the midpoint x of its ends.
pub fn bezier_line(pts: &[Pt]) -> String {
    let Some(&(x0, y0, _)) = pts.first() else {
        return String::new();
    };
    if pts.len() < 2 {
        return String::new();
    }
    let mut d = format!("M{},{}", fmt_num(x0), fmt_num(y0));
    push_segments(&mut d, pts);
    d
}

/// Closed area under [`bezier_line`] down to `base_y`, spanning `left..right`.
pub fn bezier_area(pts: &[Pt], base_y: f64, left: f64, right: f64) -> String {
    let (Some(&(x0, y0, _)), Some(&(_, yn, _))) = (pts.first(), pts.last()) else {
        return String::new();
    };
    if pts.len() < 2 {
        return String::new();
    }
    let mut d = format!(
        "M{l},{b} L{l},{y0} L{x0},{y0}",
        l = fmt_num(left),
        b = fmt_num(base_y),
        y0 = fmt_num(y0),
        x0 = fmt_num(x0),
    );
    push_segments(&mut d, pts);
    d.push_str(&format!(
        " L{r},{yn} L{r},{b} Z",
        r = fmt_num(right),
        yn = fmt_num(yn),
        b = fmt_num(base_y),
    ));
    d
}

fn push_segments(d: &mut String, pts: &[Pt]) {
    for pair in pts.windows(2) {
        let (px, py, _) = pair[0];
        let (cx, cy, _) = pair[1];
        let mx = fmt_num((px + cx) / 2.0);
        d.push_str(&format!(
            " C{mx},{} {mx},{} {},{}",
            fmt_num(py),
            fmt_num(cy),
            fmt_num(cx),
            fmt_num(cy)
        ));
    }
}

pub fn render_line(source: &ChartSource) -> Element {
    let opts = FrameOptions {
        centered: false,
        ..FrameOptions::default()
    };
    let Some(mut frame) = Frame::new(source, opts) else {
        return placeholder("No data");
    };

    let mut defs = Element::new("defs");
    for si in 0..frame.data.series.len() {
        let color = theme::color(si);
        defs.push(
            Element::new("linearGradient")
                .attr("id", gradient_id(&frame, si))
                .attr("x1", 0.0)
                .attr("y1", 0.0)
                .attr("x2", 0.0)
                .attr("y2", 1.0)
                .child(
                    Element::new("stop")
                        .attr("offset", "0%")
                        .attr("stop-color", color)
                        .attr("stop-opacity", 0.18),
                )
                .child(
                    Element::new("stop")
                        .attr("offset", "100%")
                        .attr("stop-color", color)
                        .attr("stop-opacity", 0.01),
                ),
        );
    }

    let mut shapes = vec![defs];
    let right = frame.pad.left + frame.plot_w;
    for (si, series) in frame.data.series.iter().enumerate() {
        let color = theme::color(si);
        let pts = frame.points(si);
        shapes.push(
            Element::new("path")
                .attr("d", bezier_area(&pts, frame.base_y, frame.pad.left, right))
                .attr("fill", format!("url(#{})", gradient_id(&frame, si))),
        );
        shapes.push(
            Element::new("path")
                .attr("d", bezier_line(&pts))
                .attr("fill", "none")
                .attr("stroke", color)
                .attr("stroke-width", 2.5)
                .attr("stroke-linecap", "round")
                .attr("stroke-linejoin", "round"),
        );
        for &(x, y, v) in &pts {
            shapes.push(
                Element::new("circle")
                    .attr("cx", x)
                    .attr("cy", y)
                    .attr("r", 4.0)
                    .attr("fill", BG),
            );
            shapes.push(
                Element::new("circle")
                    .attr("cx", x)
                    .attr("cy", y)
                    .attr("r", 3.5)
                    .attr("fill", "none")
                    .attr("stroke", color)
                    .attr("stroke-width", 2.0)
                    .tip(format!("{}: {}", series.label, fmt_value(v))),
            );
        }
    }

    frame.root.children.extend(shapes.into_iter().map(svg::Node::Element));
    frame.legend(LegendStyle::Line);
    frame.root
}

/// Overlapping translucent areas. Series with the largest peak are filled
/// first so smaller ones stay visible; outlines go on top in reverse.
pub fn render_area(source: &ChartSource) -> Element {
    let opts = FrameOptions {
        centered: false,
        ..FrameOptions::default()
    };
    let Some(mut frame) = Frame::new(source, opts) else {
        return placeholder("No data");
    };

    let mut order: Vec<usize> = (0..frame.data.series.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (frame.data.series[a].max(), frame.data.series[b].max());
        b.total_cmp(&a)
    });

    let right = frame.pad.left + frame.plot_w;
    let mut shapes = Vec::new();
    for &si in &order {
        let pts = frame.points(si);
        shapes.push(
            Element::new("path")
                .attr("d", bezier_area(&pts, frame.base_y, frame.pad.left, right))
                .attr("fill", theme::color(si))
                .attr("opacity", 0.35),
        );
    }
    for &si in order.iter().rev() {
        let color = theme::color(si);
        let pts = frame.points(si);
        shapes.push(
            Element::new("path")
                .attr("d", bezier_line(&pts))
                .attr("fill", "none")
                .attr("stroke", color)
                .attr("stroke-width", 1.75)
                .attr("stroke-linecap", "round"),
        );
        let label = &frame.data.series[si].label;
        for &(x, y, v) in &pts {
            shapes.push(
                Element::new("circle")
                    .attr("cx", x)
                    .attr("cy", y)
                    .attr("r", 3.0)
                    .attr("fill", color)
                    .tip(format!("{label}: {}", fmt_value(v))),
            );
        }
    }

    frame.root.children.extend(shapes.into_iter().map(svg::Node::Element));
    frame.legend(LegendStyle::Swatch);
    frame.root
}

fn gradient_id(frame: &Frame, series: usize) -> String {
    format!("{}-lg{series}", frame.id_prefix)
}
