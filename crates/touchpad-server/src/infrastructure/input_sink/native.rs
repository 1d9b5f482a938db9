//! Real desktop input through the `enigo` crate.
//!
//! Compiled only with the `native-input` feature, since `enigo` links against
//! the platform input stack (X11/libei on Linux, CoreGraphics on macOS,
//! SendInput on Windows).
//!
//! # Thread safety
//!
//! One `Enigo` handle is shared by every session behind a `Mutex`.  Holding
//! the lock for the whole of a smooth move keeps two phones from fighting
//! over the pointer mid-glide.
//!
//! # Smooth moves
//!
//! `enigo` only moves in one jump, so [`NativeSink::move_smooth`] interpolates
//! linearly in up to [`MAX_SMOOTH_STEPS`] steps spread over the requested
//! duration.

use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use enigo::{Axis, Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};
use tracing::debug;

use touchpad_core::{Key, KeyState};

use crate::application::host_input::{HostInputError, HostInputSink};

/// Upper bound on intermediate positions per smooth move.
pub const MAX_SMOOTH_STEPS: u32 = 16;

/// Sink backed by a live `enigo` connection.
pub struct NativeSink {
    enigo: Mutex<Enigo>,
}

impl NativeSink {
    /// Opens a connection to the platform input stack.
    ///
    /// # Errors
    ///
    /// Returns [`HostInputError::Unavailable`] if no display/input backend can
    /// be reached (for example, a headless session).
    pub fn new() -> Result<Self, HostInputError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| HostInputError::Unavailable(e.to_string()))?;
        debug!("enigo input backend initialised");
        Ok(Self {
            enigo: Mutex::new(enigo),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Enigo>, HostInputError> {
        self.enigo
            .lock()
            .map_err(|e| HostInputError::Platform(format!("input backend lock poisoned: {e}")))
    }
}

fn platform<E: std::fmt::Display>(e: E) -> HostInputError {
    HostInputError::Platform(e.to_string())
}

fn enigo_key(key: Key) -> enigo::Key {
    match key {
        Key::Left => enigo::Key::LeftArrow,
        Key::Right => enigo::Key::RightArrow,
        Key::Up => enigo::Key::UpArrow,
        Key::Down => enigo::Key::DownArrow,
        Key::Control => enigo::Key::Control,
        Key::Meta => enigo::Key::Meta,
        Key::Alt => enigo::Key::Alt,
        Key::Shift => enigo::Key::Shift,
    }
}

fn enigo_button(name: &str) -> Result<Button, HostInputError> {
    match name {
        "left" => Ok(Button::Left),
        "right" => Ok(Button::Right),
        "middle" | "center" => Ok(Button::Middle),
        other => Err(HostInputError::UnsupportedButton(other.to_string())),
    }
}

fn direction(state: KeyState) -> Direction {
    match state {
        KeyState::Down => Direction::Press,
        KeyState::Up => Direction::Release,
    }
}

impl HostInputSink for NativeSink {
    fn screen_size(&self) -> Result<(u32, u32), HostInputError> {
        let (w, h) = self.lock()?.main_display().map_err(platform)?;
        Ok((u32::try_from(w).unwrap_or(0), u32::try_from(h).unwrap_or(0)))
    }

    fn pointer_position(&self) -> Result<(i32, i32), HostInputError> {
        self.lock()?.location().map_err(platform)
    }

    fn move_smooth(&self, x: i32, y: i32, duration: Duration) -> Result<(), HostInputError> {
        let mut enigo = self.lock()?;
        let (start_x, start_y) = enigo.location().map_err(platform)?;

        let (span_x, span_y) = (x.saturating_sub(start_x), y.saturating_sub(start_y));
        let distance = span_x.unsigned_abs().max(span_y.unsigned_abs());
        let steps = distance.clamp(1, MAX_SMOOTH_STEPS);
        let pause = duration / steps;

        for step in 1..=steps {
            let t = f64::from(step) / f64::from(steps);
            let px = start_x.saturating_add((f64::from(span_x) * t) as i32);
            let py = start_y.saturating_add((f64::from(span_y) * t) as i32);
            enigo.move_mouse(px, py, Coordinate::Abs).map_err(platform)?;
            if step < steps && !pause.is_zero() {
                thread::sleep(pause);
            }
        }
        Ok(())
    }

    fn click(&self, button: &str) -> Result<(), HostInputError> {
        let button = enigo_button(button)?;
        self.lock()?
            .button(button, Direction::Click)
            .map_err(platform)
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), HostInputError> {
        let mut enigo = self.lock()?;
        if dx != 0 {
            enigo.scroll(dx, Axis::Horizontal).map_err(platform)?;
        }
        if dy != 0 {
            // enigo scrolls down for positive values.
            enigo.scroll(-dy, Axis::Vertical).map_err(platform)?;
        }
        Ok(())
    }

    fn key_toggle(&self, key: Key, state: KeyState) -> Result<(), HostInputError> {
        self.lock()?
            .key(enigo_key(key), direction(state))
            .map_err(platform)
    }

    fn key_tap(&self, key: Key, modifiers: &[Key]) -> Result<(), HostInputError> {
        let mut enigo = self.lock()?;
        let mut held = Vec::with_capacity(modifiers.len());
        let mut result = Ok(());

        for &m in modifiers {
            match enigo.key(enigo_key(m), Direction::Press) {
                Ok(()) => held.push(m),
                Err(e) => {
                    result = Err(platform(e));
                    break;
                }
            }
        }
        if result.is_ok() {
            result = enigo
                .key(enigo_key(key), Direction::Click)
                .map_err(platform);
        }
        // Release in reverse order, even after a failure.
        for &m in held.iter().rev() {
            if let Err(e) = enigo.key(enigo_key(m), Direction::Release) {
                result = result.and(Err(platform(e)));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_map_to_enigo_arrows() {
        assert_eq!(enigo_key(Key::Left), enigo::Key::LeftArrow);
        assert_eq!(enigo_key(Key::Down), enigo::Key::DownArrow);
    }

    #[test]
    fn test_known_buttons_map() {
        assert_eq!(enigo_button("left"), Ok(Button::Left));
        assert_eq!(enigo_button("right"), Ok(Button::Right));
        assert_eq!(enigo_button("middle"), Ok(Button::Middle));
    }

    #[test]
    fn test_unknown_button_is_rejected() {
        assert_eq!(
            enigo_button("button9"),
            Err(HostInputError::UnsupportedButton("button9".into()))
        );
    }
}
