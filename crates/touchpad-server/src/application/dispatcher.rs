//! EventDispatcher: turns one inbound frame into host input.
//!
//! The dispatcher is stateless; everything that changes between frames lives
//! in the [`Session`] passed to [`EventDispatcher::dispatch`].  One dispatcher
//! is built per connection and shares the process-wide [`HostInputSink`].
//!
//! # Handler table
//!
//! | Event        | Session state touched | Host calls                                   |
//! |--------------|-----------------------|----------------------------------------------|
//! | `deviceinfo` | calibration           | `screen_size`                                |
//! | `move`       | reads calibration     | `pointer_position`, `move_smooth`            |
//! | `click`      | –                     | `click`                                      |
//! | `scroll`     | reads scales          | `scroll` (skipped when both axes are 0)      |
//! | `zoom`       | reads scales          | modifier down, `scroll(0, n)`, modifier up   |
//! | `threeswipe` | gesture accumulator   | `key_tap(arrow, [modifier])` when one fires  |
//! | other        | –                     | –                                            |
//!
//! # Failure policy
//!
//! Nothing in here ends a session.  Malformed frames and unknown types are
//! logged and dropped; a failing host call is logged and not retried.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use touchpad_core::domain::scaling::move_offset;
use touchpad_core::{decode_event, CalibrationOutcome, DeviceInfo, InboundEvent, Key, KeyState};

use crate::application::host_input::{HostInputError, HostInputSink};
use crate::application::session::Session;
use crate::domain::config::ServerConfig;

/// Button clicked when the phone does not name one.
pub const DEFAULT_BUTTON: &str = "left";

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event was applied; host calls (if any) succeeded.
    Handled,
    /// The event was valid but called for no host action (zero scroll,
    /// rejected calibration, swipe still below threshold, ...).
    NoAction,
    /// The frame could not be decoded.
    Malformed,
    /// The frame decoded but its `type` is unknown.
    Unrecognized,
    /// A host call failed part-way; the session carries on.
    HostFailed,
}

/// Settings the dispatcher reads for every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchSettings {
    pub swipe_modifier: Key,
    pub zoom_modifier: Key,
    pub smooth_move: Duration,
}

impl From<&ServerConfig> for DispatchSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            swipe_modifier: config.swipe_modifier,
            zoom_modifier: config.zoom_modifier,
            smooth_move: config.smooth_move,
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        DispatchSettings::from(&ServerConfig::default())
    }
}

/// Holds a modifier key down until released or dropped.
///
/// The release step runs on every exit path: an explicit
/// [`ModifierGuard::release`], an early `?` return, or a panic unwinding
/// through the scope.
pub struct ModifierGuard<'a> {
    sink: &'a dyn HostInputSink,
    key: Key,
    released: bool,
}

impl<'a> ModifierGuard<'a> {
    /// Presses `key` and returns a guard that will release it.
    ///
    /// # Errors
    ///
    /// Returns the sink error if the press itself fails; no release is
    /// attempted in that case.
    pub fn press(sink: &'a dyn HostInputSink, key: Key) -> Result<Self, HostInputError> {
        sink.key_toggle(key, KeyState::Down)?;
        Ok(Self {
            sink,
            key,
            released: false,
        })
    }

    /// Releases the key now and reports whether that worked.
    ///
    /// # Errors
    ///
    /// Returns the sink error from the key-up call.
    pub fn release(mut self) -> Result<(), HostInputError> {
        self.released = true;
        self.sink.key_toggle(self.key, KeyState::Up)
    }
}

impl Drop for ModifierGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.sink.key_toggle(self.key, KeyState::Up) {
            warn!("failed to release modifier '{}': {e}", self.key);
        }
    }
}

/// Routes decoded events to the session state and the host sink.
pub struct EventDispatcher {
    sink: Arc<dyn HostInputSink>,
    settings: DispatchSettings,
}

impl EventDispatcher {
    /// Creates a dispatcher that injects input through `sink`.
    pub fn new(sink: Arc<dyn HostInputSink>, settings: DispatchSettings) -> Self {
        Self { sink, settings }
    }

    /// Decodes `raw` and applies it to `session`.
    ///
    /// Never fails: every error is logged and folded into the returned
    /// [`DispatchOutcome`].
    pub fn dispatch(&self, raw: &[u8], session: &mut Session) -> DispatchOutcome {
        let event = match decode_event(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    "session {}: invalid message ({e}): {}",
                    session.id(),
                    String::from_utf8_lossy(raw)
                );
                return DispatchOutcome::Malformed;
            }
        };

        let name = event.name();
        debug!("session {}: received {name}", session.id());

        match self.handle(event, session) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("session {}: {name} failed: {e}", session.id());
                DispatchOutcome::HostFailed
            }
        }
    }

    /// Applies an already-decoded event.
    ///
    /// # Errors
    ///
    /// Returns the first [`HostInputError`] raised by the sink.  Session
    /// state changes made before the failing call are kept.
    pub fn handle(
        &self,
        event: InboundEvent,
        session: &mut Session,
    ) -> Result<DispatchOutcome, HostInputError> {
        match event {
            InboundEvent::Calibration(info) => self.calibrate(&info, session),
            InboundEvent::Move { dx, dy } => self.move_pointer(dx, dy, session),
            InboundEvent::Click { button } => self.click(&button),
            InboundEvent::Scroll { dx, dy } => self.scroll(dx, dy, session),
            InboundEvent::Zoom { delta } => self.zoom(delta, session),
            InboundEvent::Swipe { dx, dy } => self.swipe(dx, dy, session),
            InboundEvent::Unrecognized { kind } => {
                warn!("session {}: unknown message type: {kind:?}", session.id());
                Ok(DispatchOutcome::Unrecognized)
            }
        }
    }

    // ── Handlers ──────────────────────────────────────────────────────────────

    fn calibrate(
        &self,
        info: &DeviceInfo,
        session: &mut Session,
    ) -> Result<DispatchOutcome, HostInputError> {
        if !info.is_valid() {
            debug!("session {}: ignoring incomplete device info", session.id());
            return Ok(DispatchOutcome::NoAction);
        }

        let (host_w, host_h) = self.sink.screen_size()?;
        match session.calibration.apply(info, host_w, host_h) {
            CalibrationOutcome::Applied => {
                let (sx, sy) = session.calibration.current_scale();
                info!(
                    "session {}: device info received, move scale X={sx:.2} Y={sy:.2}",
                    session.id()
                );
                Ok(DispatchOutcome::Handled)
            }
            CalibrationOutcome::Ignored => Ok(DispatchOutcome::NoAction),
        }
    }

    fn move_pointer(
        &self,
        dx: f64,
        dy: f64,
        session: &Session,
    ) -> Result<DispatchOutcome, HostInputError> {
        let (off_x, off_y) = move_offset(session.calibration.current_scale(), dx, dy);
        let (x, y) = self.sink.pointer_position()?;
        self.sink.move_smooth(
            x.saturating_add(off_x),
            y.saturating_add(off_y),
            self.settings.smooth_move,
        )?;
        Ok(DispatchOutcome::Handled)
    }

    fn click(&self, button: &str) -> Result<DispatchOutcome, HostInputError> {
        self.sink.click(&button_name(button))?;
        Ok(DispatchOutcome::Handled)
    }

    fn scroll(
        &self,
        dx: f64,
        dy: f64,
        session: &Session,
    ) -> Result<DispatchOutcome, HostInputError> {
        let (h, v) = session.scales().scroll_amount(dx, dy);
        if h == 0 && v == 0 {
            return Ok(DispatchOutcome::NoAction);
        }
        self.sink.scroll(h, v)?;
        Ok(DispatchOutcome::Handled)
    }

    fn zoom(&self, delta: f64, session: &Session) -> Result<DispatchOutcome, HostInputError> {
        if delta == 0.0 {
            return Ok(DispatchOutcome::NoAction);
        }
        let amount = session.scales().zoom_amount(delta);

        let modifier = ModifierGuard::press(self.sink.as_ref(), self.settings.zoom_modifier)?;
        self.sink.scroll(0, amount)?;
        modifier.release()?;
        Ok(DispatchOutcome::Handled)
    }

    fn swipe(
        &self,
        dx: f64,
        dy: f64,
        session: &mut Session,
    ) -> Result<DispatchOutcome, HostInputError> {
        let Some(action) = session.gestures.accumulate(dx, dy) else {
            return Ok(DispatchOutcome::NoAction);
        };

        info!(
            "session {}: three-finger swipe → {}",
            session.id(),
            action.label()
        );
        self.sink
            .key_tap(action.key(), &[self.settings.swipe_modifier])?;
        Ok(DispatchOutcome::Handled)
    }
}

/// Normalises a click button name: empty means left, otherwise lower-cased.
pub fn button_name(raw: &str) -> String {
    if raw.is_empty() {
        DEFAULT_BUTTON.to_string()
    } else {
        raw.to_lowercase()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
