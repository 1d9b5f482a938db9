//! Domain layer for touchpad-server.
//!
//! Holds the runtime configuration.  The protocol and per-session domain
//! types live in `touchpad-core`.

pub mod config;

pub use config::ServerConfig;
