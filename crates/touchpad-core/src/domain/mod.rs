//! Domain layer: per-session state with no I/O.
//!
//! - **`calibration`** – maps phone touchpad units to host pixels.
//! - **`gesture`** – integrates three-finger swipe samples into discrete
//!   virtual-desktop actions.
//! - **`scaling`** – the scroll/zoom multipliers fixed at session start and
//!   the truncation rule shared by every motion handler.

pub mod calibration;
pub mod gesture;
pub mod scaling;
