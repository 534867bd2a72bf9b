//! Scroll-synchronised companion pane.
//!
//! [`ScrollSync`] tracks which media figure sits under a virtual reading
//! line while the reading pane scrolls, and keeps exactly that figure in a
//! companion slot. It is platform neutral: everything it needs from the
//! rendering side goes through [`SyncSurface`], and time only enters through
//! explicit frame and `now` arguments.
//!
//! Event flow:
//!
//! ```text
//! scroll  -> on_scroll  -> (frame requested) -> run_frame -> update
//! resize  -> on_resize  -> (150ms quiet)     -> poll      -> re-measure + update
//! slot    -> on_slot_change -> (150ms quiet)  -> poll      -> re-measure + update
//!                           \-> activate 0 at once if idle
//! ```

mod schedule;

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

pub use schedule::{Debounce, FrameScheduler, FrameToken};

// ============================================================================
// Surface
// ============================================================================

/// Scroll geometry of the reading pane, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
    pub viewport_width: f64,
}

impl ScrollMetrics {
    /// Fraction of the scrollable distance covered, 0 when nothing scrolls.
    pub fn progress(&self) -> f64 {
        let scrollable = self.scroll_height - self.client_height;
        if scrollable > 0.0 {
            self.scroll_top / scrollable
        } else {
            0.0
        }
    }
}

/// The rendering side of a scroll-sync pane.
pub trait SyncSurface {
    fn metrics(&self) -> ScrollMetrics;

    /// Offsets of every media figure from the top of the scrollable
    /// content, in document order.
    fn anchor_offsets(&self) -> Vec<f64>;

    /// Tallest sticky element matching any selector; 0 when none match.
    fn sticky_height(&self, selectors: &[String]) -> f64;

    /// Toggle the active marker on a figure.
    fn set_active(&mut self, index: usize, active: bool);

    /// Render figure `index` into the companion slot, replacing what was
    /// there.
    fn present(&mut self, index: usize);
}

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaPosition {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    Down,
    Up,
}

impl ScrollDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    /// Reading line as a fraction of pane height while scrolling down.
    pub zone_down: f64,
    /// Reading line fraction while scrolling up.
    pub zone_up: f64,
    /// Scroll progress past which the last figure is forced active.
    pub bottom_threshold: f64,
    /// Scroll deltas up to this many pixels never change direction.
    pub dead_zone: f64,
    pub debounce: Duration,
    /// Viewport width below which the companion pane collapses.
    pub collapse_below: f64,
    pub sticky_headers: Vec<String>,
    /// `content:media` column ratio.
    pub split: String,
    pub media_position: MediaPosition,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            zone_down: 0.30,
            zone_up: 0.45,
            bottom_threshold: 0.95,
            dead_zone: 5.0,
            debounce: Duration::from_millis(150),
            collapse_below: 900.0,
            sticky_headers: Vec::new(),
            split: "1:1".into(),
            media_position: MediaPosition::Right,
        }
    }
}

/// Parse an `N:M` split into positive integer weights.
pub fn parse_split(split: &str) -> Option<(u32, u32)> {
    let (content, media) = split.split_once(':')?;
    let content = content.trim().parse().ok()?;
    let media = media.trim().parse().ok()?;
    Some((content, media))
}

// ============================================================================
// Engine
// ============================================================================

/// Emitted whenever a different figure becomes active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaChange {
    pub index: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub previous_index: Option<usize>,
}

/// Snapshot for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncState {
    /// Active figure, `None` before any figure exists.
    pub current: Option<usize>,
    pub total: usize,
    pub direction: ScrollDirection,
}

pub struct ScrollSync<S: SyncSurface> {
    surface: S,
    options: SyncOptions,
    current: Option<usize>,
    direction: ScrollDirection,
    last_scroll: f64,
    anchors: Vec<f64>,
    sticky_offset: f64,
    frames: FrameScheduler,
    resize: Debounce,
    events: Vec<MediaChange>,
    torn_down: bool,
}

impl<S: SyncSurface> ScrollSync<S> {
    /// Measure the surface and activate the first figure, if any.
    pub fn new(surface: S, options: SyncOptions) -> Self {
        let resize = Debounce::new(options.debounce);
        let mut sync = Self {
            surface,
            options,
            current: None,
            direction: ScrollDirection::Down,
            last_scroll: 0.0,
            anchors: Vec::new(),
            sticky_offset: 0.0,
            frames: FrameScheduler::new(),
            resize,
            events: Vec::new(),
            torn_down: false,
        };
        sync.measure();
        sync.show(0);
        sync
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    fn measure(&mut self) {
        self.sticky_offset = if self.options.sticky_headers.is_empty() {
            0.0
        } else {
            let height = self.surface.sticky_height(&self.options.sticky_headers);
            if height.is_finite() { height.max(0.0) } else { 0.0 }
        };
        self.anchors = self.surface.anchor_offsets();
    }

    /// Deactivate the active figure, leaving nothing active.
    fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            self.surface.set_active(previous, false);
        }
    }

    /// Activate figure `index`. Out-of-range or already active is a no-op.
    fn show(&mut self, index: usize) {
        if self.current == Some(index) || index >= self.anchors.len() {
            return;
        }
        if let Some(previous) = self.current
            && previous < self.anchors.len()
        {
            self.surface.set_active(previous, false);
        }
        self.surface.set_active(index, true);
        self.surface.present(index);

        let change = MediaChange {
            index,
            is_first: index == 0,
            is_last: index + 1 == self.anchors.len(),
            previous_index: self.current,
        };
        self.current = Some(index);
        self.events.push(change);
    }

    /// Distance of the reading line below the top of the pane.
    pub fn reading_line(&self) -> f64 {
        let height = self.surface.metrics().client_height;
        let zone = match self.direction {
            ScrollDirection::Down => self.options.zone_down,
            ScrollDirection::Up => self.options.zone_up,
        };
        height * zone + self.sticky_offset
    }

    /// Index the reading line selects at the current scroll position.
    fn active_index(&self) -> usize {
        let metrics = self.surface.metrics();
        if metrics.progress() > self.options.bottom_threshold {
            return self.anchors.len() - 1;
        }

        let trigger = metrics.scroll_top + self.reading_line();
        self.anchors
            .iter()
            .take_while(|&&offset| offset <= trigger)
            .count()
            .saturating_sub(1)
    }

    fn update(&mut self) {
        if self.anchors.is_empty() {
            return;
        }
        let index = self.active_index();
        self.show(index);
    }

    /// Scroll event: track direction outside the dead zone and request a
    /// frame.
    pub fn on_scroll(&mut self) {
        if self.torn_down {
            return;
        }
        let top = self.surface.metrics().scroll_top;
        if (top - self.last_scroll).abs() > self.options.dead_zone {
            self.direction = if top > self.last_scroll {
                ScrollDirection::Down
            } else {
                ScrollDirection::Up
            };
            self.last_scroll = top;
        }
        self.frames.request();
    }

    /// Animation frame: run the pending update, if one was requested.
    /// Returns whether an update ran.
    pub fn run_frame(&mut self) -> bool {
        if self.frames.take().is_none() {
            return false;
        }
        self.update();
        true
    }

    pub fn has_pending_frame(&self) -> bool {
        self.frames.is_pending()
    }

    /// Viewport or content size changed.
    pub fn on_resize(&mut self, now: Instant) {
        if !self.torn_down {
            self.resize.trigger(now);
        }
    }

    /// Run the debounced re-measure once the resize burst is over.
    /// Returns whether it ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.resize.take_if_ready(now) {
            return false;
        }
        self.measure();
        self.update();
        true
    }

    /// Figures were added, removed or reassigned.
    ///
    /// The full re-measure and recheck follow through the same debounce as
    /// [`on_resize`](Self::on_resize). Only the figure count is read at
    /// once, so a pane that had no active figure shows the first one
    /// without waiting.
    pub fn on_slot_change(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        self.resize.trigger(now);
        self.anchors = self.surface.anchor_offsets();
        if self.current.is_some_and(|i| i >= self.anchors.len()) {
            self.clear();
        }
        if self.current.is_none() {
            self.show(0);
        }
    }

    /// Re-measure everything after a programmatic content change and
    /// restart from the first figure.
    pub fn recompute(&mut self) {
        self.clear();
        self.measure();
        self.show(0);
        self.update();
    }

    /// Drop the pending frame and debounce. Later events are ignored.
    pub fn teardown(&mut self) {
        self.frames.cancel();
        self.resize.cancel();
        self.torn_down = true;
    }

    pub fn state(&self) -> SyncState {
        SyncState {
            current: self.current,
            total: self.anchors.len(),
            direction: self.direction,
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Media change notifications since the last call.
    pub fn take_events(&mut self) -> Vec<MediaChange> {
        std::mem::take(&mut self.events)
    }

    /// Narrow viewports show a single column without the companion pane.
    pub fn is_collapsed(&self) -> bool {
        self.surface.metrics().viewport_width < self.options.collapse_below
    }

    /// CSS grid columns for the content/media split.
    pub fn grid_columns(&self) -> String {
        let (content, media) = parse_split(&self.options.split).unwrap_or((1, 1));
        match self.options.media_position {
            MediaPosition::Left => format!("{media}fr {content}fr"),
            MediaPosition::Right => format!("{content}fr {media}fr"),
        }
    }

    /// One-line status, e.g. `dir: down | zone: 240px | active: 1/3`.
    pub fn debug_summary(&self) -> String {
        format!(
            "dir: {} | zone: {}px | active: {}/{}",
            self.direction,
            self.reading_line().round(),
            self.current.map_or(0, |i| i + 1),
            self.anchors.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pane {
        metrics: ScrollMetrics,
        anchors: Vec<f64>,
        sticky: f64,
        active: Vec<usize>,
        slot: Option<usize>,
        presented: usize,
    }

    impl Pane {
        fn new(anchors: &[f64]) -> Self {
            Self {
                metrics: ScrollMetrics {
                    scroll_top: 0.0,
                    client_height: 1000.0,
                    scroll_height: 6000.0,
                    viewport_width: 1280.0,
                },
                anchors: anchors.to_vec(),
                ..Self::default()
            }
        }
    }

    impl SyncSurface for Pane {
        fn metrics(&self) -> ScrollMetrics {
            self.metrics
        }

        fn anchor_offsets(&self) -> Vec<f64> {
            self.anchors.clone()
        }

        fn sticky_height(&self, _: &[String]) -> f64 {
            self.sticky
        }

        fn set_active(&mut self, index: usize, active: bool) {
            self.active.retain(|&i| i != index);
            if active {
                self.active.push(index);
            }
        }

        fn present(&mut self, index: usize) {
            self.slot = Some(index);
            self.presented += 1;
        }
    }

    fn scroll_to(sync: &mut ScrollSync<Pane>, top: f64) {
        sync.surface_mut().metrics.scroll_top = top;
        sync.on_scroll();
        sync.run_frame();
    }

    #[test]
    fn test_first_figure_active_on_start() {
        let mut sync = ScrollSync::new(Pane::new(&[100.0, 1500.0, 3000.0]), SyncOptions::default());
        assert_eq!(sync.current(), Some(0));
        assert_eq!(sync.surface().slot, Some(0));
        assert_eq!(sync.surface().active, vec![0]);
        assert_eq!(
            sync.take_events(),
            vec![MediaChange {
                index: 0,
                is_first: true,
                is_last: false,
                previous_index: None,
            }]
        );
    }

    #[test]
    fn test_no_anchors() {
        let mut sync = ScrollSync::new(Pane::new(&[]), SyncOptions::default());
        scroll_to(&mut sync, 400.0);
        sync.recompute();
        let state = sync.state();
        assert_eq!(state.current, None);
        assert_eq!(state.total, 0);
        assert!(sync.take_events().is_empty());
        assert_eq!(sync.debug_summary(), "dir: down | zone: 300px | active: 0/0");
    }

    #[test]
    fn test_reading_line_follows_direction() {
        let mut sync = ScrollSync::new(Pane::new(&[0.0, 1500.0, 3000.0]), SyncOptions::default());
        // Down: line at 300px, trigger 1200 + 300 = 1500.
        scroll_to(&mut sync, 1200.0);
        assert_eq!(sync.current(), Some(1));

        // Up: line at 450px, trigger 1000 + 450 still reaches nothing past 1450.
        scroll_to(&mut sync, 1000.0);
        assert_eq!(sync.state().direction, ScrollDirection::Up);
        assert_eq!(sync.current(), Some(0));
        assert_eq!(sync.debug_summary(), "dir: up | zone: 450px | active: 1/3");
    }

    #[test]
    fn test_dead_zone_keeps_direction() {
        let mut sync = ScrollSync::new(Pane::new(&[0.0]), SyncOptions::default());
        scroll_to(&mut sync, 100.0);
        scroll_to(&mut sync, 97.0);
        assert_eq!(sync.state().direction, ScrollDirection::Down);
        scroll_to(&mut sync, 90.0);
        assert_eq!(sync.state().direction, ScrollDirection::Up);
    }

    #[test]
    fn test_bottom_forces_last() {
        let mut pane = Pane::new(&[0.0, 2000.0, 5000.0]);
        pane.metrics.scroll_height = 3000.0;
        let mut sync = ScrollSync::new(pane, SyncOptions::default());

        // Trigger at 1950 + 300 selects index 1; progress 0.975 overrides it.
        scroll_to(&mut sync, 1950.0);
        assert_eq!(sync.current(), Some(2));
        let last = sync.take_events().pop().unwrap();
        assert!(last.is_last);
        assert_eq!(last.previous_index, Some(0));
    }

    #[test]
    fn test_frames_coalesce_scrolls() {
        let mut sync = ScrollSync::new(Pane::new(&[0.0, 500.0]), SyncOptions::default());
        sync.surface_mut().metrics.scroll_top = 100.0;
        sync.on_scroll();
        sync.surface_mut().metrics.scroll_top = 300.0;
        sync.on_scroll();
        assert!(sync.has_pending_frame());
        assert!(sync.run_frame());
        assert!(!sync.run_frame());
        assert_eq!(sync.current(), Some(1));
    }

    #[test]
    fn test_activation_idempotent() {
        let mut sync = ScrollSync::new(Pane::new(&[0.0, 5000.0]), SyncOptions::default());
        sync.take_events();
        scroll_to(&mut sync, 10.0);
        scroll_to(&mut sync, 20.0);
        assert!(sync.take_events().is_empty());
        assert_eq!(sync.surface().presented, 1);
    }

    #[test]
    fn test_recompute_idempotent() {
        let mut sync = ScrollSync::new(Pane::new(&[0.0, 800.0, 3000.0]), SyncOptions::default());
        scroll_to(&mut sync, 600.0);
        sync.recompute();
        let first = sync.current();
        sync.recompute();
        assert_eq!(sync.current(), first);
        assert_eq!(first, Some(1));
    }

    #[test]
    fn test_resize_debounced() {
        let start = Instant::now();
        let ms = Duration::from_millis;
        let mut sync = ScrollSync::new(Pane::new(&[0.0, 5000.0]), SyncOptions::default());
        sync.surface_mut().anchors = vec![0.0, 200.0];
        sync.surface_mut().sticky = 80.0;

        sync.on_resize(start);
        sync.on_resize(start + ms(100));
        assert!(!sync.poll(start + ms(200)));
        assert_eq!(sync.current(), Some(0));
        assert!(sync.poll(start + ms(260)));
        // No sticky selectors configured, so the header is ignored.
        assert_eq!(sync.reading_line(), 300.0);
        assert_eq!(sync.current(), Some(1));
    }

    #[test]
    fn test_sticky_header_offset() {
        let mut pane = Pane::new(&[0.0, 350.0]);
        pane.sticky = 60.0;
        let options = SyncOptions {
            sticky_headers: vec!["header".into()],
            ..SyncOptions::default()
        };
        let sync = ScrollSync::new(pane, options);
        assert_eq!(sync.reading_line(), 360.0);
        assert_eq!(sync.current(), Some(0));
    }

    #[test]
    fn test_slot_change_only_starts_idle() {
        let now = Instant::now();
        let mut sync = ScrollSync::new(Pane::new(&[]), SyncOptions::default());
        sync.surface_mut().anchors = vec![0.0, 400.0];
        sync.on_slot_change(now);
        assert_eq!(sync.current(), Some(0));

        scroll_to(&mut sync, 200.0);
        assert_eq!(sync.current(), Some(1));
        sync.on_slot_change(now);
        assert_eq!(sync.current(), Some(1));
    }

    #[test]
    fn test_slot_change_rechecks_after_debounce() {
        let start = Instant::now();
        let ms = Duration::from_millis;
        let options = SyncOptions {
            sticky_headers: vec!["header".into()],
            ..SyncOptions::default()
        };
        let mut sync = ScrollSync::new(Pane::new(&[0.0, 400.0]), options);
        scroll_to(&mut sync, 200.0);
        assert_eq!(sync.current(), Some(1));

        // Figure 1 moved below the reading line and a header appeared.
        sync.surface_mut().anchors = vec![0.0, 900.0, 1200.0];
        sync.surface_mut().sticky = 50.0;
        sync.on_slot_change(start);
        assert_eq!(sync.current(), Some(1));
        assert!(!sync.poll(start + ms(100)));

        assert!(sync.poll(start + ms(160)));
        assert_eq!(sync.reading_line(), 350.0);
        assert_eq!(sync.current(), Some(0));
        assert_eq!(sync.surface().active, vec![0]);
        assert_eq!(sync.state().total, 3);
    }

    #[test]
    fn test_slot_change_drops_vanished_figure() {
        let now = Instant::now();
        let mut sync = ScrollSync::new(Pane::new(&[0.0, 400.0, 800.0]), SyncOptions::default());
        scroll_to(&mut sync, 600.0);
        assert_eq!(sync.current(), Some(2));

        sync.surface_mut().anchors = vec![0.0];
        sync.on_slot_change(now);
        assert_eq!(sync.current(), Some(0));
        assert_eq!(sync.surface().active, vec![0]);
    }

    #[test]
    fn test_recompute_leaves_one_active() {
        let mut sync = ScrollSync::new(Pane::new(&[100.0, 1500.0, 3000.0]), SyncOptions::default());
        scroll_to(&mut sync, 2800.0);
        assert_eq!(sync.current(), Some(2));
        assert_eq!(sync.surface().active, vec![2]);

        sync.surface_mut().metrics.scroll_top = 1300.0;
        sync.recompute();
        assert_eq!(sync.current(), Some(1));
        assert_eq!(sync.surface().active, vec![1]);
        assert_eq!(sync.surface().slot, Some(1));
    }

    #[test]
    fn test_teardown_stops_updates() {
        let mut sync = ScrollSync::new(Pane::new(&[0.0, 100.0]), SyncOptions::default());
        sync.surface_mut().metrics.scroll_top = 500.0;
        sync.on_scroll();
        sync.teardown();
        assert!(!sync.run_frame());
        sync.on_scroll();
        assert!(!sync.has_pending_frame());
        assert_eq!(sync.current(), Some(0));
    }

    #[test]
    fn test_layout_helpers() {
        let mut pane = Pane::new(&[0.0]);
        pane.metrics.viewport_width = 800.0;
        let options = SyncOptions {
            split: "3:2".into(),
            media_position: MediaPosition::Left,
            ..SyncOptions::default()
        };
        let sync = ScrollSync::new(pane, options);
        assert!(sync.is_collapsed());
        assert_eq!(sync.grid_columns(), "2fr 3fr");

        let fallback = ScrollSync::new(
            Pane::new(&[0.0]),
            SyncOptions {
                split: "wide".into(),
                ..SyncOptions::default()
            },
        );
        assert_eq!(fallback.grid_columns(), "1fr 1fr");
        assert!(!fallback.is_collapsed());
        assert_eq!(parse_split(" 2 : 1 "), Some((2, 1)));
    }
}
