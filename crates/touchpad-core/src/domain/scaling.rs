//! Scroll and zoom multipliers, and the truncation rule for host units.
//!
//! Host input APIs take whole pixels and whole wheel clicks.  Every real-valued
//! delta is converted with [`to_host_units`], which truncates toward zero, so
//! `2.9 → 2` and `-2.9 → -2`.  Sub-unit motion is dropped rather than carried
//! over to the next event.

/// Base scale used when none is configured.
pub const DEFAULT_BASE_SCALE: f64 = 5.0;

/// Converts a real-valued delta to host units, truncating toward zero.
///
/// Out-of-range values saturate at `i32::MIN`/`i32::MAX`; `NaN` becomes 0.
pub fn to_host_units(value: f64) -> i32 {
    value as i32
}

/// Scales a touchpad move delta by the calibration's move scale.
pub fn move_offset(scale: (f64, f64), dx: f64, dy: f64) -> (i32, i32) {
    (to_host_units(dx * scale.0), to_host_units(dy * scale.1))
}

/// Scroll and zoom multipliers fixed for the life of one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionScales {
    /// Multiplier applied to scroll deltas.
    pub scroll: f64,
    /// Multiplier applied to pinch deltas; half the base scale.
    pub zoom: f64,
}

impl SessionScales {
    /// Derives the session multipliers from the configured base scale.
    pub fn from_base(base: f64) -> Self {
        Self {
            scroll: base,
            zoom: base / 2.0,
        }
    }

    /// Host scroll amounts for a two-finger scroll.
    ///
    /// The vertical axis is inverted (natural scrolling): dragging the fingers
    /// up yields a positive host `dy`.
    pub fn scroll_amount(&self, dx: f64, dy: f64) -> (i32, i32) {
        (
            to_host_units(dx * self.scroll),
            to_host_units(-dy * self.scroll),
        )
    }

    /// Host vertical wheel amount for a pinch delta.
    ///
    /// Spreading the fingers (positive delta) scrolls down, which most hosts
    /// treat as zoom-in while the zoom modifier is held.
    pub fn zoom_amount(&self, delta: f64) -> i32 {
        to_host_units(-delta * self.zoom)
    }
}

impl Default for SessionScales {
    fn default() -> Self {
        Self::from_base(DEFAULT_BASE_SCALE)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
