//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! `main.rs` fills it from CLI arguments and environment variables; tests
//! build it directly from [`ServerConfig::default`] plus a token.
//!
//! Keeping configuration as a plain struct (no global state) is what lets
//! every session derive its own scale factors at accept time without reading
//! anything shared and mutable.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use touchpad_core::domain::scaling::DEFAULT_BASE_SCALE;
use touchpad_core::{Key, SessionScales};

/// Reasons a configuration is rejected at startup.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// No shared token was configured; every phone would be rejected.
    #[error("an auth token is required (--token or TOUCHPAD_TOKEN)")]
    MissingToken,

    /// The base scale must be a positive, finite number.
    #[error("scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    /// A key configured as a modifier is not a modifier key.
    #[error("'{0}' is not a modifier key")]
    NotAModifier(Key),
}

/// All runtime configuration for the touchpad server.
///
/// Build this once at startup and wrap it in an `Arc` so every session task
/// can read it.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address and port the WebSocket server binds to.
    pub bind_addr: SocketAddr,

    /// Shared secret the phone must present when connecting.
    pub token: String,

    /// Base scale: scroll multiplier, and twice the zoom multiplier.
    pub base_scale: f64,

    /// Modifier tapped together with an arrow key for swipe gestures.
    pub swipe_modifier: Key,

    /// Modifier held down while a pinch is replayed as a wheel scroll.
    pub zoom_modifier: Key,

    /// Duration of one smooth pointer move.
    pub smooth_move: Duration,
}

impl ServerConfig {
    /// Checks the settings that would otherwise only fail once a phone connects.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if !(self.base_scale.is_finite() && self.base_scale > 0.0) {
            return Err(ConfigError::InvalidScale(self.base_scale));
        }
        for key in [self.swipe_modifier, self.zoom_modifier] {
            if !key.is_modifier() {
                return Err(ConfigError::NotAModifier(key));
            }
        }
        Ok(())
    }

    /// Scroll/zoom multipliers handed to each new session.
    pub fn session_scales(&self) -> SessionScales {
        SessionScales::from_base(self.base_scale)
    }
}

impl Default for ServerConfig {
    /// Defaults suitable for local development.  The token is empty and must
    /// be set before [`ServerConfig::validate`] passes.
    ///
    /// | Field          | Default        |
    /// |----------------|----------------|
    /// | bind_addr      | `0.0.0.0:8080` |
    /// | base_scale     | 5.0            |
    /// | swipe_modifier | ctrl           |
    /// | zoom_modifier  | ctrl           |
    /// | smooth_move    | 8 ms           |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            token: String::new(),
            base_scale: DEFAULT_BASE_SCALE,
            swipe_modifier: Key::Control,
            zoom_modifier: Key::Control,
            smooth_move: Duration::from_millis(8),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("token", &"<redacted>")
            .field("base_scale", &self.base_scale)
            .field("swipe_modifier", &self.swipe_modifier)
            .field("zoom_modifier", &self.zoom_modifier)
            .field("smooth_move", &self.smooth_move)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
