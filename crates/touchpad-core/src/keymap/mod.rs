//! Host keys the server can press.
//!
//! The touchpad never types text; it only taps arrow keys together with a
//! modifier (virtual-desktop gestures) and holds a modifier while scrolling
//! (pinch zoom).  This module names that small vocabulary and parses the
//! user-facing spellings accepted on the command line.
//!
//! | Accepted names                    | Key            |
//! |-----------------------------------|----------------|
//! | `ctrl`, `control`                 | [`Key::Control`] |
//! | `cmd`, `command`, `meta`, `super`, `win` | [`Key::Meta`] |
//! | `alt`, `option`                   | [`Key::Alt`]     |
//! | `shift`                           | [`Key::Shift`]   |
//! | `left`, `right`, `up`, `down`     | arrow keys     |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A host key used by gesture and zoom actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Control,
    /// Command on macOS, Windows/Super elsewhere.
    Meta,
    Alt,
    Shift,
}

impl Key {
    /// Canonical lower-case name, as used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Key::Left => "left",
            Key::Right => "right",
            Key::Up => "up",
            Key::Down => "down",
            Key::Control => "ctrl",
            Key::Meta => "cmd",
            Key::Alt => "alt",
            Key::Shift => "shift",
        }
    }

    /// Whether this key is a modifier (valid for holding or combining).
    pub fn is_modifier(self) -> bool {
        matches!(self, Key::Control | Key::Meta | Key::Alt | Key::Shift)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a key name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown key name: '{0}'")]
pub struct KeyParseError(pub String);

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "ctrl" | "control" => Ok(Key::Control),
            "cmd" | "command" | "meta" | "super" | "win" => Ok(Key::Meta),
            "alt" | "option" => Ok(Key::Alt),
            "shift" => Ok(Key::Shift),
            _ => Err(KeyParseError(s.to_string())),
        }
    }
}

/// Whether a toggled key goes down or comes back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    Down,
    Up,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modifier_aliases() {
        assert_eq!("ctrl".parse(), Ok(Key::Control));
        assert_eq!("Control".parse(), Ok(Key::Control));
        assert_eq!("cmd".parse(), Ok(Key::Meta));
        assert_eq!("SUPER".parse(), Ok(Key::Meta));
        assert_eq!("option".parse(), Ok(Key::Alt));
        assert_eq!(" shift ".parse(), Ok(Key::Shift));
    }

    #[test]
    fn test_parse_arrows() {
        assert_eq!("left".parse(), Ok(Key::Left));
        assert_eq!("Down".parse(), Ok(Key::Down));
    }

    #[test]
    fn test_parse_unknown_name_is_error() {
        let result: Result<Key, _> = "hyper".parse();
        assert_eq!(result, Err(KeyParseError("hyper".to_string())));
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for key in [
            Key::Left,
            Key::Right,
            Key::Up,
            Key::Down,
            Key::Control,
            Key::Meta,
            Key::Alt,
            Key::Shift,
        ] {
            assert_eq!(key.name().parse(), Ok(key));
        }
    }

    #[test]
    fn test_only_modifiers_are_modifiers() {
        assert!(Key::Control.is_modifier());
        assert!(Key::Meta.is_modifier());
        assert!(!Key::Left.is_modifier());
        assert!(!Key::Up.is_modifier());
    }
}
