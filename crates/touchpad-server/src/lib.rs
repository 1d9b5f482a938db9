//! touchpad-server library crate.
//!
//! This crate accepts WebSocket connections from a phone-side touchpad client
//! and replays each gesture as desktop input.  It serves only the `/ws`
//! endpoint; the client itself is hosted elsewhere.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Phone (JSON over WebSocket)
//!         ↓
//! [touchpad-server]
//!   ├── domain/           ServerConfig
//!   ├── application/      Session state, EventDispatcher, HostInputSink trait, auth
//!   └── infrastructure/
//!         ├── ws_server/   Accept loop + per-session read loop (tokio-tungstenite)
//!         └── input_sink/  Recording, logging, and native (enigo) sinks
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `touchpad-core` only; it talks to
//!   the desktop exclusively through the [`application::HostInputSink`] trait.
//! - `infrastructure` depends on all other layers plus `tokio` and `tungstenite`.

/// Domain layer: configuration types (no I/O).
pub mod domain;

/// Application layer: per-session state and event dispatch.
pub mod application;

/// Infrastructure layer: WebSocket server and host input sinks.
pub mod infrastructure;
