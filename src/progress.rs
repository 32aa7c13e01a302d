//! Reading progress tracking for long documents.
//!
//! Progress is the scrolled fraction of a document's scrollable distance,
//! expressed as a percentage and always within `[0, 100]`. Scroll and
//! resize events only mark the tracker dirty; the owning loop calls
//! `flush_frame` once per frame, so any number of events between frames
//! collapses into at most one recomputation and one notification.
//!
//! Subscribers are plain callbacks. A subscriber that panics is caught
//! and evicted without disturbing the tracker or the remaining
//! subscribers.

use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Measurements of the viewport over the tracked content.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportMetrics {
    /// Distance scrolled from the top, in pixels
    pub scroll_offset: f64,

    /// Height of the visible viewport, in pixels
    pub viewport_height: f64,

    /// Full height of the content, in pixels
    pub content_height: f64,
}

/// Handle identifying one subscription, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Compute reading progress for a set of viewport measurements.
///
/// The scrollable distance is the content height minus the viewport
/// height. When nothing can be scrolled (content fits, or measurements
/// are degenerate) progress is 0.
///
/// # Returns
/// A percentage, always within `[0, 100]`.
pub fn progress_percent(metrics: ViewportMetrics) -> f64 {
    let total = metrics.content_height - metrics.viewport_height;
    if total.is_nan() || total <= 0.0 {
        return 0.0;
    }

    let percent = metrics.scroll_offset / total * 100.0;
    if !percent.is_finite() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

type ProgressCallback = Box<dyn FnMut(f64) + Send>;

/// Observer that turns scroll and resize events into progress updates.
pub struct ReadingProgressTracker {
    metrics: ViewportMetrics,
    progress: f64,
    dirty: bool,
    torn_down: bool,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, ProgressCallback)>,
}

impl ReadingProgressTracker {
    /// Create a tracker with empty measurements and progress 0.
    pub fn new() -> Self {
        ReadingProgressTracker {
            metrics: ViewportMetrics::default(),
            progress: 0.0,
            dirty: false,
            torn_down: false,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Register a callback invoked with the new percentage whenever
    /// progress changes.
    ///
    /// After teardown the returned handle refers to nothing.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(f64) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        if !self.torn_down {
            self.subscribers.push((id, Box::new(callback)));
        }
        id
    }

    /// Remove a subscription.
    ///
    /// # Returns
    /// `true` if the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Record a scroll event. Takes effect at the next `flush_frame`.
    pub fn on_scroll(&mut self, scroll_offset: f64) {
        if self.torn_down {
            return;
        }
        self.metrics.scroll_offset = scroll_offset;
        self.dirty = true;
    }

    /// Record a resize event. Takes effect at the next `flush_frame`.
    pub fn on_resize(&mut self, viewport_height: f64, content_height: f64) {
        if self.torn_down {
            return;
        }
        self.metrics.viewport_height = viewport_height;
        self.metrics.content_height = content_height;
        self.dirty = true;
    }

    /// Recompute progress from the latest measurements and notify
    /// subscribers if it changed.
    ///
    /// All events since the previous flush collapse into this single
    /// recomputation. A no-op when nothing changed or after teardown.
    pub fn flush_frame(&mut self) {
        if self.torn_down || !self.dirty {
            return;
        }
        self.dirty = false;

        let updated = progress_percent(self.metrics);
        if updated == self.progress {
            return;
        }
        self.progress = updated;

        self.subscribers.retain_mut(|(id, callback)| {
            let outcome = catch_unwind(AssertUnwindSafe(|| callback(updated)));
            if outcome.is_err() {
                warn!(subscription = id.0, "Progress subscriber panicked, evicting it");
                return false;
            }
            true
        });
    }

    /// The most recently flushed progress percentage.
    pub fn current_progress(&self) -> f64 {
        self.progress
    }

    /// Drop every subscription and ignore all further events.
    pub fn teardown(&mut self) {
        self.subscribers.clear();
        self.torn_down = true;
        self.dirty = false;
    }
}

impl Default for ReadingProgressTracker {
    fn default() -> Self {
        ReadingProgressTracker::new()
    }
}
