//! Pointer bookkeeping: press tracking and double-click detection.

use std::time::{Duration, Instant};

use crate::manipulator::GestureTarget;

pub const DEFAULT_DOUBLE_CLICK: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
}

/// Detects two clicks on the same target within a time window.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    window: Duration,
    last: Option<(GestureTarget, Instant)>,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK)
    }
}

impl ClickTracker {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Record a click. A double click consumes the pending click, so a third
    /// click starts a fresh pair.
    pub fn register(&mut self, target: GestureTarget, now: Instant) -> ClickKind {
        let is_double = self.last.is_some_and(|(previous, at)| {
            previous == target && now.saturating_duration_since(at) <= self.window
        });
        if is_double {
            self.last = None;
            ClickKind::Double
        } else {
            self.last = Some((target, now));
            ClickKind::Single
        }
    }

    pub fn forget(&mut self) {
        self.last = None;
    }
}

/// A button held down over an interactive element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub target: GestureTarget,
    /// Set once the pointer moved with the button held and a drag began.
    pub dragging: bool,
}

impl Press {
    #[must_use]
    pub const fn new(target: GestureTarget) -> Self {
        Self {
            target,
            dragging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClickKind, ClickTracker};
    use crate::manipulator::{GestureTarget, PoolLabel, ShapeId};
    use std::time::{Duration, Instant};

    fn shape(index: u32) -> GestureTarget {
        GestureTarget::Shape(ShapeId::new(PoolLabel::Secondary, index))
    }

    #[test]
    fn two_quick_clicks_on_same_target_are_double() {
        let mut tracker = ClickTracker::new(Duration::from_millis(400));
        let t0 = Instant::now();
        assert_eq!(tracker.register(shape(0), t0), ClickKind::Single);
        assert_eq!(
            tracker.register(shape(0), t0 + Duration::from_millis(200)),
            ClickKind::Double
        );
        assert_eq!(
            tracker.register(shape(0), t0 + Duration::from_millis(300)),
            ClickKind::Single
        );
    }

    #[test]
    fn slow_clicks_are_single() {
        let mut tracker = ClickTracker::new(Duration::from_millis(400));
        let t0 = Instant::now();
        tracker.register(shape(0), t0);
        assert_eq!(
            tracker.register(shape(0), t0 + Duration::from_millis(401)),
            ClickKind::Single
        );
    }

    #[test]
    fn different_targets_do_not_pair() {
        let mut tracker = ClickTracker::default();
        let t0 = Instant::now();
        tracker.register(shape(0), t0);
        assert_eq!(tracker.register(shape(1), t0), ClickKind::Single);
        assert_eq!(tracker.register(shape(1), t0), ClickKind::Double);
    }

    #[test]
    fn forget_drops_pending_click() {
        let mut tracker = ClickTracker::default();
        let t0 = Instant::now();
        tracker.register(shape(0), t0);
        tracker.forget();
        assert_eq!(tracker.register(shape(0), t0), ClickKind::Single);
    }
}
