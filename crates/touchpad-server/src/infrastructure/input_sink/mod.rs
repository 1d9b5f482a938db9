//! Host input sink implementations.
//!
//! | Sink              | Use                                              |
//! |-------------------|--------------------------------------------------|
//! | [`NativeSink`]    | Real injection through `enigo` (`native-input`)  |
//! | [`LoggingSink`]   | `--dry-run`: logs every call, touches nothing    |
//! | [`RecordingSink`] | Tests: records every call in order               |

pub mod logging;
#[cfg(feature = "native-input")]
pub mod native;
pub mod recording;

pub use logging::LoggingSink;
#[cfg(feature = "native-input")]
pub use native::NativeSink;
pub use recording::{RecordedAction, RecordingSink};
