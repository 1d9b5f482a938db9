//! Per-connection session state.
//!
//! A [`Session`] is created when a phone's WebSocket handshake succeeds and
//! dropped when the socket closes.  It owns everything that changes while
//! events are processed, so two phones connected at once never see each
//! other's calibration or half-finished swipe.

use std::fmt;

use touchpad_core::{Calibration, GestureAccumulator, SessionScales};
use uuid::Uuid;

/// Identifier used to tell sessions apart in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    /// Shows the first eight hex digits; enough to correlate log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// Mutable state owned by one connection.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    pub(crate) calibration: Calibration,
    pub(crate) gestures: GestureAccumulator,
    scales: SessionScales,
}

impl Session {
    /// Starts a session with identity calibration and an empty accumulator.
    pub fn new(scales: SessionScales) -> Self {
        Self {
            id: SessionId::new(),
            calibration: Calibration::new(),
            gestures: GestureAccumulator::new(),
            scales,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn gestures(&self) -> &GestureAccumulator {
        &self.gestures
    }

    /// Scroll/zoom multipliers fixed when the session started.
    pub fn scales(&self) -> SessionScales {
        self.scales
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
