//! The host input capability consumed by the dispatcher.
//!
//! The dispatcher never touches an OS API.  Everything it does to the desktop
//! goes through [`HostInputSink`], which the infrastructure layer implements
//! once per backend (native injection, dry-run logging, in-memory recording).
//!
//! # Coordinate and sign conventions
//!
//! - Pointer positions are absolute host pixels, origin top-left.
//! - `scroll(dx, dy)`: positive `dx` scrolls right, positive `dy` scrolls up.
//!
//! # Concurrency
//!
//! One sink instance is shared by every session (`Arc<dyn HostInputSink>`), so
//! implementations must be `Send + Sync` and serialise internally if the
//! backend needs it.  No ordering is promised between sessions.

use std::time::Duration;

use thiserror::Error;
use touchpad_core::{Key, KeyState};

/// Error type for host input operations.
#[derive(Debug, Error, PartialEq)]
pub enum HostInputError {
    /// The input backend could not be reached or initialised.
    #[error("host input unavailable: {0}")]
    Unavailable(String),

    /// The backend does not know the requested button name.
    #[error("unsupported mouse button: '{0}'")]
    UnsupportedButton(String),

    /// The backend reported a failure while injecting an event.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Opaque set of desktop input capabilities.
#[cfg_attr(test, mockall::automock)]
pub trait HostInputSink: Send + Sync {
    /// Size of the main display in pixels.
    fn screen_size(&self) -> Result<(u32, u32), HostInputError>;

    /// Current absolute pointer position.
    fn pointer_position(&self) -> Result<(i32, i32), HostInputError>;

    /// Glides the pointer to `(x, y)` over roughly `duration`.
    fn move_smooth(&self, x: i32, y: i32, duration: Duration) -> Result<(), HostInputError>;

    /// Clicks the named button (`"left"`, `"right"`, ...).
    fn click(&self, button: &str) -> Result<(), HostInputError>;

    /// Scrolls by whole wheel units; see the module docs for signs.
    fn scroll(&self, dx: i32, dy: i32) -> Result<(), HostInputError>;

    /// Presses or releases a single key.
    fn key_toggle(&self, key: Key, state: KeyState) -> Result<(), HostInputError>;

    /// Taps `key` while `modifiers` are held.
    fn key_tap(&self, key: Key, modifiers: &[Key]) -> Result<(), HostInputError>;
}
