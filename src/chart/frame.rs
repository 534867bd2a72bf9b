//! Shared scaffold for the category-axis charts (bar, line, area, stacked).

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::svg::{self, Element};

use super::scale::{fmt_tick, nice_max, nice_step, ticks};
use super::source::{ChartSource, SeriesData};
use super::theme::{self, DIM, GRID};

pub const LEGEND_H: f64 = 32.0;
pub const DESC_H: f64 = 20.0;
const TITLE_H: f64 = 28.0;

#[derive(Debug, Clone, Copy)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// How the axis maximum is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxFrom {
    /// Largest single value.
    Values,
    /// Largest per-category sum.
    Totals,
}

#[derive(Debug, Clone, Copy)]
pub struct FrameOptions {
    /// Categories sit in the middle of equal slots (bars) rather than on
    /// evenly spaced points from edge to edge (lines).
    pub centered: bool,
    pub max_from: MaxFrom,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            centered: true,
            max_from: MaxFrom::Values,
        }
    }
}

/// Laid-out chart frame with grid, axis labels and header already drawn.
#[derive(Debug)]
pub struct Frame {
    pub root: Element,
    pub data: SeriesData,
    pub pad: Padding,
    pub width: f64,
    pub height: f64,
    pub plot_w: f64,
    pub plot_h: f64,
    pub base_y: f64,
    pub max: f64,
    /// Prefix for ids, unique per source text.
    pub id_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendStyle {
    Swatch,
    Line,
}

impl Frame {
    /// `None` when there are no categories or no series.
    pub fn new(source: &ChartSource, opts: FrameOptions) -> Option<Self> {
        let data = SeriesData::from_source(source);
        if data.is_empty() {
            return None;
        }

        let title = source.title();
        let desc = source.description();
        let header = (if title.is_some() { TITLE_H } else { 0.0 })
            + (if desc.is_some() { DESC_H } else { 0.0 });

        let width = 600.0;
        let height = 340.0 + header + LEGEND_H;
        let pad = Padding {
            top: 20.0 + header,
            right: 24.0,
            bottom: 40.0 + LEGEND_H,
            left: 56.0,
        };

        let peak = match opts.max_from {
            MaxFrom::Values => data.values().fold(f64::NEG_INFINITY, f64::max),
            MaxFrom::Totals => data
                .category_totals()
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max),
        };
        let max = nice_max(peak);
        let plot_w = width - pad.left - pad.right;
        let plot_h = height - pad.top - pad.bottom;
        let base_y = pad.top + plot_h;

        let mut root = svg::root(width, height);
        if let Some(title) = title {
            root.push(theme::title(pad.left, 18.0, title));
        }
        if let Some(desc) = desc {
            let y = if title.is_some() { 38.0 } else { 18.0 };
            root.push(theme::description(pad.left, y, desc));
        }

        let step = nice_step(max);
        for tick in ticks(max, step) {
            let y = base_y - (tick / max) * plot_h;
            root.push(
                Element::new("line")
                    .attr("x1", pad.left)
                    .attr("x2", width - pad.right)
                    .attr("y1", y)
                    .attr("y2", y)
                    .attr("stroke", GRID)
                    .attr("stroke-width", 1.0),
            );
            root.push(
                theme::text(pad.left - 8.0, y + 4.0, fmt_tick(tick, step), 11.0, DIM)
                    .attr("text-anchor", "end"),
            );
        }

        let n = data.categories.len();
        let slot_w = if opts.centered || n <= 1 {
            plot_w / n as f64
        } else {
            plot_w / (n - 1) as f64
        };
        let font_size = (slot_w / 4.0).clamp(8.0, 11.0);
        for (i, category) in data.categories.iter().enumerate() {
            let x = if opts.centered {
                pad.left + slot_w * i as f64 + slot_w / 2.0
            } else {
                pad.left + (plot_w / (n.max(2) - 1) as f64) * i as f64
            };
            root.push(theme::text(x, base_y + 18.0, category, font_size, DIM));
        }

        Some(Self {
            root,
            data,
            pad,
            width,
            height,
            plot_w,
            plot_h,
            base_y,
            max,
            id_prefix: id_prefix(source),
        })
    }

    /// Height of `value` in plot units.
    pub fn scale(&self, value: f64) -> f64 {
        (value / self.max) * self.plot_h
    }

    /// Edge-to-edge point positions for one series. Missing cells sit on
    /// the baseline.
    pub fn points(&self, series: usize) -> Vec<(f64, f64, f64)> {
        let n = self.data.categories.len();
        let dx = self.plot_w / (n.max(2) - 1) as f64;
        let s = &self.data.series[series];
        (0..s.values.len())
            .map(|i| {
                let v = s.value(i);
                (self.pad.left + dx * i as f64, self.base_y - self.scale(v), v)
            })
            .collect()
    }

    /// Series legend along the bottom edge.
    pub fn legend(&mut self, style: LegendStyle) {
        let y = self.height - 12.0;
        let mut x = self.pad.left;
        for (i, series) in self.data.series.iter().enumerate() {
            let color = theme::color(i);
            match style {
                LegendStyle::Line => {
                    self.root.push(
                        Element::new("line")
                            .attr("x1", x)
                            .attr("y1", y)
                            .attr("x2", x + 16.0)
                            .attr("y2", y)
                            .attr("stroke", color)
                            .attr("stroke-width", 2.5)
                            .attr("stroke-linecap", "round"),
                    );
                    self.root.push(
                        Element::new("circle")
                            .attr("cx", x + 8.0)
                            .attr("cy", y)
                            .attr("r", 2.5)
                            .attr("fill", color),
                    );
                }
                LegendStyle::Swatch => {
                    self.root.push(
                        Element::new("rect")
                            .attr("x", x)
                            .attr("y", y - 5.0)
                            .attr("width", 10.0)
                            .attr("height", 10.0)
                            .attr("rx", 2.0)
                            .attr("fill", color)
                            .attr("opacity", 0.85),
                    );
                }
            }
            self.root.push(
                theme::text(x + 16.0, y + 4.0, &series.label, 11.0, DIM).attr("text-anchor", "start"),
            );
            x += 24.0 + series.label.chars().count() as f64 * 6.5;
        }
    }
}

fn id_prefix(source: &ChartSource) -> String {
    let mut hasher = FxHasher::default();
    source.header.hash(&mut hasher);
    source.rows.hash(&mut hasher);
    source.meta.hash(&mut hasher);
    format!("fc{:x}", hasher.finish() & 0xff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::source::parse_source;

    #[test]
    fn test_empty_frame() {
        assert!(Frame::new(&parse_source("A\nB"), FrameOptions::default()).is_none());
        assert!(Frame::new(&parse_source(",Q1"), FrameOptions::default()).is_none());
    }

    #[test]
    fn test_frame_geometry() {
        let frame = Frame::new(&parse_source(",a,b,c\ns,3,47,12"), FrameOptions::default()).unwrap();
        assert_eq!(frame.max, 50.0);
        assert_eq!(frame.width, 600.0);
        assert_eq!(frame.height, 372.0);
        assert_eq!(frame.base_y, 300.0);
        assert_eq!(frame.plot_h, 280.0);
        // Six grid lines for ticks 0..=50 step 10.
        assert_eq!(frame.root.find_all("line").len(), 6);
    }

    #[test]
    fn test_title_grows_frame() {
        let plain = Frame::new(&parse_source(",a\ns,1"), FrameOptions::default()).unwrap();
        let titled =
            Frame::new(&parse_source("title: T\ndescription: D\n,a\ns,1"), FrameOptions::default())
                .unwrap();
        assert_eq!(titled.height - plain.height, 48.0);
        assert_eq!(titled.plot_h, plain.plot_h);
    }

    #[test]
    fn test_totals_max() {
        let opts = FrameOptions {
            max_from: MaxFrom::Totals,
            ..FrameOptions::default()
        };
        let frame = Frame::new(&parse_source(",a\nx,30\ny,17"), opts).unwrap();
        assert_eq!(frame.max, 50.0);
    }

    #[test]
    fn test_points_run_edge_to_edge() {
        let opts = FrameOptions {
            centered: false,
            ..FrameOptions::default()
        };
        let frame = Frame::new(&parse_source(",a,b,c\ns,0,5,"), opts).unwrap();
        let pts = frame.points(0);
        assert_eq!(pts[0].0, frame.pad.left);
        assert_eq!(pts[2].0, frame.pad.left + frame.plot_w);
        assert_eq!(pts[2].1, frame.base_y);
    }
}
