//! Dry-run sink: logs every call and injects nothing.
//!
//! Selected with `--dry-run`.  Useful for checking a phone's gestures on a
//! headless box or in a build without the `native-input` feature.  The
//! pointer is tracked virtually and clamped to the configured screen so
//! relative moves still produce sensible coordinates in the log.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::info;

use touchpad_core::{Key, KeyState};

use crate::application::host_input::{HostInputError, HostInputSink};

/// Sink that writes each host call to the log at `info` level.
#[derive(Debug)]
pub struct LoggingSink {
    screen: (u32, u32),
    pointer: Mutex<(i32, i32)>,
}

impl LoggingSink {
    /// Creates a sink reporting a `width`×`height` screen, pointer centred.
    pub fn new(width: u32, height: u32) -> Self {
        let centre = (half(width), half(height));
        Self {
            screen: (width, height),
            pointer: Mutex::new(centre),
        }
    }

    fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        let max_x = i32::try_from(self.screen.0).unwrap_or(i32::MAX).saturating_sub(1);
        let max_y = i32::try_from(self.screen.1).unwrap_or(i32::MAX).saturating_sub(1);
        (x.clamp(0, max_x.max(0)), y.clamp(0, max_y.max(0)))
    }
}

fn half(extent: u32) -> i32 {
    i32::try_from(extent / 2).unwrap_or(i32::MAX)
}

impl HostInputSink for LoggingSink {
    fn screen_size(&self) -> Result<(u32, u32), HostInputError> {
        Ok(self.screen)
    }

    fn pointer_position(&self) -> Result<(i32, i32), HostInputError> {
        Ok(*self.pointer.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn move_smooth(&self, x: i32, y: i32, duration: Duration) -> Result<(), HostInputError> {
        let target = self.clamp(x, y);
        *self.pointer.lock().unwrap_or_else(PoisonError::into_inner) = target;
        info!(
            "[dry-run] move pointer to ({}, {}) over {duration:?}",
            target.0, target.1
        );
        Ok(())
    }

    fn click(&self, button: &str) -> Result<(), HostInputError> {
        info!("[dry-run] click {button}");
        Ok(())
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), HostInputError> {
        info!("[dry-run] scroll dx={dx} dy={dy}");
        Ok(())
    }

    fn key_toggle(&self, key: Key, state: KeyState) -> Result<(), HostInputError> {
        info!("[dry-run] key {key} {state:?}");
        Ok(())
    }

    fn key_tap(&self, key: Key, modifiers: &[Key]) -> Result<(), HostInputError> {
        let combo: Vec<&str> = modifiers.iter().map(|m| m.name()).collect();
        info!("[dry-run] tap {key} with [{}]", combo.join("+"));
        Ok(())
    }
}
