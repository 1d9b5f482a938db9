//! Application layer for touchpad-server.
//!
//! Use cases that sit between the WebSocket transport and the host:
//!
//! - [`auth`]: checking the shared token presented in the upgrade request.
//! - [`session`]: the state one phone connection owns.
//! - [`dispatcher`]: routing each decoded event to the session and the sink.
//! - [`host_input`]: the sink trait the infrastructure layer implements.

pub mod auth;
pub mod dispatcher;
pub mod host_input;
pub mod session;

pub use dispatcher::{DispatchOutcome, DispatchSettings, EventDispatcher};
pub use host_input::{HostInputError, HostInputSink};
pub use session::{Session, SessionId};
