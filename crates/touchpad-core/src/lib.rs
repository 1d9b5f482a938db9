//! # touchpad-core
//!
//! Shared library for the remote touchpad containing the inbound wire
//! protocol, the per-session domain state (calibration and gesture
//! accumulation), and the host key vocabulary.
//!
//! It has zero dependencies on OS APIs, async runtimes, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! A touchpad client on a phone turns its screen into a touchpad.  Every
//! finger movement becomes a small JSON message sent over a WebSocket to the
//! desktop, where the server replays it as real pointer, scroll, and keyboard
//! input.
//!
//! This crate is the part of that pipeline that has rules worth testing:
//!
//! - **`protocol`** – How one WebSocket frame becomes a typed
//!   [`InboundEvent`].  The `type` field is matched case-insensitively and
//!   anything unknown becomes [`InboundEvent::Unrecognized`] instead of an
//!   error.
//!
//! - **`domain`** – The state that lives for one connection: the
//!   [`Calibration`] that maps phone units to desktop pixels, and the
//!   [`GestureAccumulator`] that turns a stream of three-finger swipe deltas
//!   into discrete virtual-desktop actions.
//!
//! - **`keymap`** – The small set of host keys the server ever presses
//!   (arrows and modifiers) plus their user-facing names.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::calibration::{Calibration, CalibrationOutcome, DeviceInfo};
pub use domain::gesture::{GestureAccumulator, SwipeAction, SWIPE_THRESHOLD};
pub use domain::scaling::SessionScales;
pub use keymap::{Key, KeyState};
pub use protocol::codec::{decode_event, ProtocolError};
pub use protocol::messages::{EventKind, InboundEvent};
