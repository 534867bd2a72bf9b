//! Pie and donut charts.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::svg::{self, Element, fmt_num, fmt_value};

use super::source::{ChartSource, pie_slices};
use super::theme::{self, FG, placeholder};

const WIDTH: f64 = 420.0;
const RADIUS: f64 = 110.0;
/// Inner radius of a donut, as a fraction of the outer.
const DONUT_HOLE: f64 = 0.55;
const LABEL_OFFSET: f64 = 20.0;

/// Slices run clockwise from twelve o'clock.
pub fn render_pie(source: &ChartSource, donut: bool) -> Element {
    let slices = pie_slices(source);
    if slices.is_empty() {
        return placeholder("No data");
    }
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if !(total.is_finite() && total > 0.0) {
        return placeholder("No data");
    }

    let header_h = theme::header_height(source.title().is_some(), source.description().is_some());
    let height = 320.0 + header_h;
    let (cx, cy) = (WIDTH / 2.0, header_h + 150.0);

    let mut root = svg::root(WIDTH, height);
    theme::header(&mut root, source.title(), source.description(), 24.0, 18.0);

    let mut angle = -FRAC_PI_2;
    for (i, slice) in slices.iter().enumerate() {
        let sweep = (slice.value / total) * TAU;
        let color = theme::color(i);
        let d = if donut {
            donut_path(cx, cy, angle, sweep)
        } else {
            pie_path(cx, cy, angle, sweep)
        };
        root.push(
            Element::new("path")
                .attr("d", d)
                .attr("fill", color)
                .attr("opacity", 0.85)
                .tip(format!(
                    "{}: {} ({}%)",
                    slice.label,
                    fmt_value(slice.value),
                    percent(slice.value, total)
                )),
        );

        let mid = angle + sweep / 2.0;
        let anchor = if mid.cos() < 0.0 { "end" } else { "start" };
        let r = RADIUS + LABEL_OFFSET;
        root.push(
            theme::text(cx + r * mid.cos(), cy + r * mid.sin(), &slice.label, 11.0, color)
                .attr("text-anchor", anchor),
        );
        angle += sweep;
    }

    if donut {
        let first = percent(slices[0].value, total);
        root.push(theme::text(cx, cy + 6.0, format!("{first}%"), 20.0, FG));
    }
    root
}

fn percent(value: f64, total: f64) -> i64 {
    (value / total * 100.0).round() as i64
}

fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> String {
    format!("{},{}", fmt_num(cx + r * angle.cos()), fmt_num(cy + r * angle.sin()))
}

fn large_arc(sweep: f64) -> u8 {
    u8::from(sweep > PI)
}

/// A sweep this close to a full turn would start and end on the same point,
/// which an SVG arc draws as nothing.
fn is_full_turn(sweep: f64) -> bool {
    sweep >= TAU - 1e-9
}

/// Closed circle of radius `r` as two half arcs. `clockwise: false` winds
/// the other way so it cuts a hole out of an enclosing ring.
fn circle_path(cx: f64, cy: f64, r: f64, start: f64, clockwise: bool) -> String {
    let flag = u8::from(clockwise);
    format!(
        "M{from} A{r},{r} 0 1 {flag} {half} A{r},{r} 0 1 {flag} {from} Z",
        from = polar(cx, cy, r, start),
        half = polar(cx, cy, r, start + PI),
        r = fmt_num(r),
    )
}

fn pie_path(cx: f64, cy: f64, start: f64, sweep: f64) -> String {
    if is_full_turn(sweep) {
        return circle_path(cx, cy, RADIUS, start, true);
    }
    format!(
        "M{},{} L{} A{r},{r} 0 {} 1 {} Z",
        fmt_num(cx),
        fmt_num(cy),
        polar(cx, cy, RADIUS, start),
        large_arc(sweep),
        polar(cx, cy, RADIUS, start + sweep),
        r = fmt_num(RADIUS),
    )
}

fn donut_path(cx: f64, cy: f64, start: f64, sweep: f64) -> String {
    let inner = RADIUS * DONUT_HOLE;
    if is_full_turn(sweep) {
        return format!(
            "{} {}",
            circle_path(cx, cy, RADIUS, start, true),
            circle_path(cx, cy, inner, start, false)
        );
    }
    let lg = large_arc(sweep);
    format!(
        "M{} L{} A{r},{r} 0 {lg} 1 {} L{} A{ir},{ir} 0 {lg} 0 {}",
        polar(cx, cy, inner, start),
        polar(cx, cy, RADIUS, start),
        polar(cx, cy, RADIUS, start + sweep),
        polar(cx, cy, inner, start + sweep),
        polar(cx, cy, inner, start),
        r = fmt_num(RADIUS),
        ir = fmt_num(inner),
    )
}
