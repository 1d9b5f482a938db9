//! Three-finger swipe accumulator.
//!
//! The phone sends a stream of small `threeswipe` deltas while three fingers
//! are on the glass.  The accumulator sums them and, once either axis moves
//! further than [`SWIPE_THRESHOLD`], emits exactly one [`SwipeAction`] and
//! starts over from zero.
//!
//! # Decision order
//!
//! ```text
//! dx >  T → NextDesktop        ┐ horizontal wins
//! dx < -T → PreviousDesktop    ┘
//! dy >  T → AppExpose          ┐ only when no horizontal action fired
//! dy < -T → MissionControl     ┘
//! ```
//!
//! Comparisons are strict: a total of exactly `T` does not fire.  Any firing
//! clears *both* axes, not only the one that crossed.

use crate::keymap::Key;

/// Distance, in touchpad units, an axis must exceed before a swipe fires.
pub const SWIPE_THRESHOLD: f64 = 5.0;

/// Discrete action produced by a completed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeAction {
    /// Swipe right: switch to the next virtual desktop.
    NextDesktop,
    /// Swipe left: switch to the previous virtual desktop.
    PreviousDesktop,
    /// Swipe down: show the windows of the current application.
    AppExpose,
    /// Swipe up: show all windows and desktops.
    MissionControl,
}

impl SwipeAction {
    /// The arrow key tapped (together with the swipe modifier) for this action.
    pub fn key(self) -> Key {
        match self {
            SwipeAction::NextDesktop => Key::Right,
            SwipeAction::PreviousDesktop => Key::Left,
            SwipeAction::AppExpose => Key::Down,
            SwipeAction::MissionControl => Key::Up,
        }
    }

    /// Human-readable label for log lines.
    pub fn label(self) -> &'static str {
        match self {
            SwipeAction::NextDesktop => "next desktop",
            SwipeAction::PreviousDesktop => "previous desktop",
            SwipeAction::AppExpose => "app exposé",
            SwipeAction::MissionControl => "mission control",
        }
    }
}

/// Running sum of swipe deltas for one session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureAccumulator {
    dx: f64,
    dy: f64,
}

impl GestureAccumulator {
    /// Creates an accumulator at `(0, 0)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one swipe sample and returns the action it completes, if any.
    ///
    /// At most one action is returned per call.  When an action is returned
    /// both running totals are already back at zero.
    pub fn accumulate(&mut self, dx: f64, dy: f64) -> Option<SwipeAction> {
        self.dx += dx;
        self.dy += dy;

        let action = if self.dx > SWIPE_THRESHOLD {
            Some(SwipeAction::NextDesktop)
        } else if self.dx < -SWIPE_THRESHOLD {
            Some(SwipeAction::PreviousDesktop)
        } else if self.dy > SWIPE_THRESHOLD {
            Some(SwipeAction::AppExpose)
        } else if self.dy < -SWIPE_THRESHOLD {
            Some(SwipeAction::MissionControl)
        } else {
            None
        };

        if action.is_some() {
            self.reset();
        }
        action
    }

    /// The `(dx, dy)` collected so far that has not yet fired.
    pub fn pending(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    /// Discards any partial swipe.
    pub fn reset(&mut self) {
        self.dx = 0.0;
        self.dy = 0.0;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_threshold_accumulates_without_firing() {
        // Arrange
        let mut acc = GestureAccumulator::new();

        // Act
        let first = acc.accumulate(3.0, 0.0);

        // Assert
        assert_eq!(first, None);
        assert_eq!(acc.pending(), (3.0, 0.0));
    }

    #[test]
    fn test_crossing_threshold_fires_and_resets() {
        let mut acc = GestureAccumulator::new();

        assert_eq!(acc.accumulate(3.0, 0.0), None);
        assert_eq!(acc.accumulate(3.0, 0.0), Some(SwipeAction::NextDesktop));
        assert_eq!(acc.pending(), (0.0, 0.0));
        assert_eq!(acc.accumulate(0.0, 0.0), None);
    }

    #[test]
    fn test_exact_threshold_does_not_fire() {
        let mut acc = GestureAccumulator::new();
        assert_eq!(acc.accumulate(SWIPE_THRESHOLD, -SWIPE_THRESHOLD), None);
        assert_eq!(acc.pending(), (5.0, -5.0));
    }

    #[test]
    fn test_horizontal_takes_priority_over_vertical() {
        let mut acc = GestureAccumulator::new();

        let action = acc.accumulate(6.0, 6.0);

        assert_eq!(action, Some(SwipeAction::NextDesktop));
        // The vertical total is cleared too, so nothing is left to fire.
        assert_eq!(acc.pending(), (0.0, 0.0));
        assert_eq!(acc.accumulate(0.0, 0.0), None);
    }

    #[test]
    fn test_each_direction_maps_to_its_action() {
        let cases = [
            ((6.0, 0.0), SwipeAction::NextDesktop, Key::Right),
            ((-6.0, 0.0), SwipeAction::PreviousDesktop, Key::Left),
            ((0.0, 6.0), SwipeAction::AppExpose, Key::Down),
            ((0.0, -6.0), SwipeAction::MissionControl, Key::Up),
        ];

        for ((dx, dy), expected, key) in cases {
            let mut acc = GestureAccumulator::new();
            let action = acc.accumulate(dx, dy);
            assert_eq!(action, Some(expected));
            assert_eq!(expected.key(), key);
        }
    }

    #[test]
    fn test_vertical_fires_when_horizontal_is_within_threshold() {
        let mut acc = GestureAccumulator::new();
        assert_eq!(acc.accumulate(4.0, -5.5), Some(SwipeAction::MissionControl));
        assert_eq!(acc.pending(), (0.0, 0.0));
    }

    #[test]
    fn test_opposite_samples_cancel_out() {
        let mut acc = GestureAccumulator::new();
        acc.accumulate(4.0, 0.0);
        acc.accumulate(-4.0, 0.0);
        assert_eq!(acc.accumulate(-4.0, 0.0), None);
        assert_eq!(acc.pending(), (-4.0, 0.0));
    }

    #[test]
    fn test_reset_discards_partial_swipe() {
        let mut acc = GestureAccumulator::new();
        acc.accumulate(4.9, 4.9);
        acc.reset();
        assert_eq!(acc.accumulate(1.0, 1.0), None);
    }
}
