//! Infrastructure layer for touchpad-server.
//!
//! Handles all I/O: accepting WebSocket connections from phones and turning
//! dispatcher calls into real (or recorded) desktop input.
//!
//! # What does NOT belong here?
//!
//! - Gesture and calibration rules (those live in `touchpad-core`)
//! - Event routing (that is the application layer)
//! - Configuration parsing (that is done in `main.rs`)

pub mod input_sink;
pub mod ws_server;

pub use ws_server::{run_server, serve, WS_PATH};
