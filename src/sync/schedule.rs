//! Frame throttling and resize debouncing.
//!
//! Both are pure timing state: callers pass `now` in and act on the answer,
//! so the engine can be driven by a real event loop or by tests alike.

use std::time::{Duration, Instant};

/// Handle for one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken(u64);

/// At most one pending frame at a time.
///
/// Requests made while a frame is pending coalesce into it.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<FrameToken>,
    issued: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a frame. Returns the new token, or `None` if one is pending.
    pub fn request(&mut self) -> Option<FrameToken> {
        if self.pending.is_some() {
            return None;
        }
        self.issued += 1;
        let token = FrameToken(self.issued);
        self.pending = Some(token);
        Some(token)
    }

    /// Consume the pending frame, if any.
    pub fn take(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Trailing-edge debounce: fires once `delay` has passed since the last
/// trigger.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    last_event: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_event: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record an event, restarting the wait.
    pub fn trigger(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    pub fn is_armed(&self) -> bool {
        self.last_event.is_some()
    }

    /// Whether the wait has elapsed at `now`.
    pub fn is_ready(&self, now: Instant) -> bool {
        self.last_event
            .is_some_and(|last| now.saturating_duration_since(last) >= self.delay)
    }

    /// Fire if ready. Returns `true` exactly once per quiet period.
    pub fn take_if_ready(&mut self, now: Instant) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last_event = None;
        true
    }

    pub fn cancel(&mut self) {
        self.last_event = None;
    }
}
