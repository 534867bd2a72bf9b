//! Lazy chart and diagram rendering across a parsed document.
//!
//! Figures hydrate independently and in parallel. A figure is hydrated at
//! most once: success stores the SVG, failure stores
//! [`Rendered::Fallback`] so the raw source is shown as code and the figure
//! is never retried. One failing figure never affects its siblings.

use std::sync::Arc;

use rayon::prelude::*;

use crate::chart;
use crate::debug;
use crate::diagram::{self, LayeredLayout, LayoutEngine, LayoutError};
use crate::markdown::{Figure, Media, MediaKind, ParsedDocument, Rendered};

#[derive(Debug, thiserror::Error)]
pub enum HydrationError {
    #[error("no {} renderer available", .0.as_str())]
    RendererUnavailable(MediaKind),

    #[error("diagram layout failed: {0}")]
    Layout(#[from] LayoutError),
}

/// What one [`Hydrator::hydrate`] call did.
#[derive(Debug, Default)]
pub struct HydrationReport {
    pub charts: usize,
    pub diagrams: usize,
    /// Figures already hydrated before the call.
    pub skipped: usize,
    /// Figure index (among figures) and cause, for every fallback.
    pub failures: Vec<(usize, HydrationError)>,
}

impl HydrationReport {
    pub fn rendered(&self) -> usize {
        self.charts + self.diagrams
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders chart and diagram figures.
///
/// A missing renderer is modelled as `charts: false` or `layout: None`;
/// affected figures degrade to their source text.
#[derive(Clone)]
pub struct Hydrator {
    charts: bool,
    layout: Option<Arc<dyn LayoutEngine>>,
}

impl Default for Hydrator {
    fn default() -> Self {
        Self {
            charts: true,
            layout: Some(Arc::new(LayeredLayout::default())),
        }
    }
}

impl Hydrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, engine: Arc<dyn LayoutEngine>) -> Self {
        self.layout = Some(engine);
        self
    }

    pub fn without_layout(mut self) -> Self {
        self.layout = None;
        self
    }

    pub fn without_charts(mut self) -> Self {
        self.charts = false;
        self
    }

    /// Render one figure.
    ///
    /// Returns `Ok(None)` for figures that need no work (already hydrated,
    /// or not a chart/diagram). On error the figure is marked
    /// [`Rendered::Fallback`].
    pub fn hydrate_figure(&self, figure: &mut Figure) -> Result<Option<MediaKind>, HydrationError> {
        if figure.is_hydrated() || !figure.media.needs_hydration() {
            return Ok(None);
        }

        let result = match &figure.media {
            Media::Chart { kind, source } => self.render_chart(kind, source),
            Media::Diagram { direction, source } => self.render_diagram(*direction, source),
            _ => return Ok(None),
        };

        match result {
            Ok(svg) => {
                figure.rendered = Some(Rendered::Svg(svg));
                Ok(Some(figure.kind()))
            }
            Err(e) => {
                figure.rendered = Some(Rendered::Fallback);
                Err(e)
            }
        }
    }

    fn render_chart(&self, kind: &str, source: &str) -> Result<String, HydrationError> {
        if !self.charts {
            return Err(HydrationError::RendererUnavailable(MediaKind::Chart));
        }
        let kind = (!kind.is_empty()).then_some(kind);
        Ok(chart::render_chart(source, kind).to_svg())
    }

    fn render_diagram(
        &self,
        direction: Option<crate::markdown::Direction>,
        source: &str,
    ) -> Result<String, HydrationError> {
        let engine = self
            .layout
            .as_deref()
            .ok_or(HydrationError::RendererUnavailable(MediaKind::Flow))?;
        Ok(diagram::render_diagram(source, direction, engine)?.to_svg())
    }

    /// Hydrate every figure of `doc` in parallel.
    pub fn hydrate(&self, doc: &mut ParsedDocument) -> HydrationReport {
        let figures: Vec<&mut Figure> = doc.figures_mut().collect();
        let skipped = figures.iter().filter(|f| f.is_hydrated()).count();

        let outcomes: Vec<(usize, Result<Option<MediaKind>, HydrationError>)> = figures
            .into_par_iter()
            .enumerate()
            .map(|(i, figure)| (i, self.hydrate_figure(figure)))
            .collect();

        let mut report = HydrationReport {
            skipped,
            ..HydrationReport::default()
        };
        for (i, outcome) in outcomes {
            match outcome {
                Ok(Some(MediaKind::Chart)) => report.charts += 1,
                Ok(Some(MediaKind::Flow)) => report.diagrams += 1,
                Ok(_) => {}
                Err(e) => {
                    debug!("hydrate"; "figure {i} fell back to source: {e}");
                    report.failures.push((i, e));
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{LayoutInput, LayoutOptions, LayoutOutput};
    use crate::markdown;

    const DOC: &str = "# Report\n\n```chart-bar\n, Q1, Q2\nSales, 3, 5\n```\n\n```flow LR\n[a] [b]\n```\n\n```rust\nfn main() {}\n```\n";

    struct Broken;

    impl LayoutEngine for Broken {
        fn layout(&self, _: &LayoutInput, _: &LayoutOptions) -> Result<LayoutOutput, LayoutError> {
            Err(LayoutError::Engine("unreachable".into()))
        }
    }

    #[test]
    fn test_hydrates_charts_and_diagrams() {
        let mut doc = markdown::parse(DOC);
        let report = Hydrator::new().hydrate(&mut doc);
        assert_eq!((report.charts, report.diagrams), (1, 1));
        assert!(report.is_clean());

        let html = doc.to_html();
        assert!(html.contains("<div class=\"fc-chart\"><svg"));
        assert!(html.contains("<div class=\"fc-diagram\"><svg"));
        assert!(html.contains("data-lang=\"rust\""));
    }

    #[test]
    fn test_idempotent() {
        let mut doc = markdown::parse(DOC);
        let hydrator = Hydrator::new();
        hydrator.hydrate(&mut doc);
        let first = doc.clone();

        let again = hydrator.hydrate(&mut doc);
        assert_eq!(again.rendered(), 0);
        assert_eq!(again.skipped, 2);
        assert_eq!(doc, first);
    }

    #[test]
    fn test_layout_failure_isolated() {
        let mut doc = markdown::parse(DOC);
        let report = Hydrator::new().with_layout(Arc::new(Broken)).hydrate(&mut doc);
        assert_eq!(report.charts, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].1, HydrationError::Layout(_)));

        let states: Vec<_> = doc.figures().map(|f| f.rendered.clone()).collect();
        assert!(matches!(states[0], Some(Rendered::Svg(_))));
        assert_eq!(states[1], Some(Rendered::Fallback));
        assert_eq!(states[2], None);
        assert!(doc.to_html().contains("<code class=\"language-flow\">[a] [b]</code>"));
    }

    #[test]
    fn test_missing_renderers_fall_back() {
        let mut doc = markdown::parse(DOC);
        let report = Hydrator::new().without_charts().without_layout().hydrate(&mut doc);
        assert_eq!(report.rendered(), 0);
        assert_eq!(report.failures.len(), 2);
        assert!(doc.figures().take(2).all(Figure::is_hydrated));
    }
}
