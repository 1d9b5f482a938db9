//! Calibration store: maps phone touchpad units to host pixels.
//!
//! The phone reports how large its touch surface is (`deviceinfo`).  Dividing
//! the host display size by the touchpad size gives a per-axis multiplier so
//! that a finger sweeping the whole touchpad sweeps the whole host screen.
//!
//! ```text
//! host 2000×2400, touchpad 500×800  →  move scale (4.0, 3.0)
//! ```
//!
//! Until the first valid `deviceinfo` arrives the scale is the identity
//! `(1.0, 1.0)`, so raw deltas are used unchanged.

/// Dimensions reported by the phone in a `deviceinfo` event.
///
/// All four values are real numbers straight off the wire; nothing has been
/// validated yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceInfo {
    /// Width of the touch surface, in the phone's CSS pixels.
    pub touchpad_width: f64,
    /// Height of the touch surface, in the phone's CSS pixels.
    pub touchpad_height: f64,
    /// Width of the phone's screen.
    pub screen_width: f64,
    /// Height of the phone's screen.
    pub screen_height: f64,
}

impl DeviceInfo {
    /// Returns `true` when every dimension is strictly positive.
    ///
    /// `NaN` compares false and is therefore rejected too.
    pub fn is_valid(&self) -> bool {
        self.touchpad_width > 0.0
            && self.touchpad_height > 0.0
            && self.screen_width > 0.0
            && self.screen_height > 0.0
    }
}

/// Result of [`Calibration::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationOutcome {
    /// All fields were replaced and the move scale recomputed.
    Applied,
    /// At least one dimension was non-positive; nothing changed.
    Ignored,
}

/// Per-session calibration state.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    touchpad_width: f64,
    touchpad_height: f64,
    screen_width: u32,
    screen_height: u32,
    move_scale_x: f64,
    move_scale_y: f64,
    calibrated: bool,
}

/// Touchpad size assumed before the phone reports its own.
const DEFAULT_TOUCHPAD_WIDTH: f64 = 500.0;
const DEFAULT_TOUCHPAD_HEIGHT: f64 = 800.0;

impl Default for Calibration {
    fn default() -> Self {
        Self {
            touchpad_width: DEFAULT_TOUCHPAD_WIDTH,
            touchpad_height: DEFAULT_TOUCHPAD_HEIGHT,
            screen_width: 0,
            screen_height: 0,
            move_scale_x: 1.0,
            move_scale_y: 1.0,
            calibrated: false,
        }
    }
}

impl Calibration {
    /// Creates an uncalibrated store with identity scaling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a `deviceinfo` report against the host's current display size.
    ///
    /// All-or-nothing: if any of the four reported dimensions is not strictly
    /// positive, the previous calibration is left untouched and
    /// [`CalibrationOutcome::Ignored`] is returned.  Otherwise every field is
    /// replaced together and
    ///
    /// ```text
    /// move_scale_x = host_width  / touchpad_width
    /// move_scale_y = host_height / touchpad_height
    /// ```
    ///
    /// The phone screen size is stored truncated toward zero.
    pub fn apply(
        &mut self,
        info: &DeviceInfo,
        host_width: u32,
        host_height: u32,
    ) -> CalibrationOutcome {
        if !info.is_valid() {
            return CalibrationOutcome::Ignored;
        }

        *self = Self {
            touchpad_width: info.touchpad_width,
            touchpad_height: info.touchpad_height,
            screen_width: info.screen_width as u32,
            screen_height: info.screen_height as u32,
            move_scale_x: f64::from(host_width) / info.touchpad_width,
            move_scale_y: f64::from(host_height) / info.touchpad_height,
            calibrated: true,
        };
        CalibrationOutcome::Applied
    }

    /// Current `(move_scale_x, move_scale_y)`; `(1.0, 1.0)` until calibrated.
    pub fn current_scale(&self) -> (f64, f64) {
        (self.move_scale_x, self.move_scale_y)
    }

    /// Whether a valid `deviceinfo` has been applied in this session.
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Touchpad `(width, height)` last reported by the phone.
    pub fn touchpad_size(&self) -> (f64, f64) {
        (self.touchpad_width, self.touchpad_height)
    }

    /// Phone screen `(width, height)`; `(0, 0)` until calibrated.
    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
