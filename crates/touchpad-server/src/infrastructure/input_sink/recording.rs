//! In-memory sink that records every call.
//!
//! Nothing reaches the OS.  Each successful call is appended to one ordered
//! log so tests can assert on the exact sequence the dispatcher produced,
//! including the relative order of modifier presses and scrolls.
//!
//! ```ignore
//! let sink = Arc::new(RecordingSink::new().with_pointer(100, 100));
//! let dispatcher = EventDispatcher::new(sink.clone(), DispatchSettings::default());
//!
//! dispatcher.dispatch(br#"{"type":"click"}"#, &mut session);
//!
//! assert_eq!(sink.actions(), vec![RecordedAction::Click("left".into())]);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use touchpad_core::{Key, KeyState};

use crate::application::host_input::{HostInputError, HostInputSink};

/// One call observed by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAction {
    MoveSmooth { x: i32, y: i32 },
    Click(String),
    Scroll { dx: i32, dy: i32 },
    KeyToggle(Key, KeyState),
    KeyTap { key: Key, modifiers: Vec<Key> },
}

#[derive(Debug)]
struct State {
    pointer: (i32, i32),
    actions: Vec<RecordedAction>,
}

/// A sink that records calls instead of injecting them.
#[derive(Debug)]
pub struct RecordingSink {
    screen: (u32, u32),
    state: Mutex<State>,
    /// When set, every call returns [`HostInputError::Platform`] and nothing
    /// is recorded.
    should_fail: AtomicBool,
}

impl RecordingSink {
    /// A 1920×1080 screen with the pointer at the origin.
    pub fn new() -> Self {
        Self {
            screen: (1920, 1080),
            state: Mutex::new(State {
                pointer: (0, 0),
                actions: Vec::new(),
            }),
            should_fail: AtomicBool::new(false),
        }
    }

    /// Sets the reported screen size.
    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = (width, height);
        self
    }

    /// Sets the starting pointer position.
    pub fn with_pointer(self, x: i32, y: i32) -> Self {
        self.lock().pointer = (x, y);
        self
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of the calls recorded so far, oldest first.
    pub fn actions(&self) -> Vec<RecordedAction> {
        self.lock().actions.clone()
    }

    /// Current virtual pointer position.
    pub fn pointer(&self) -> (i32, i32) {
        self.lock().pointer
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), HostInputError> {
        if self.should_fail.load(Ordering::SeqCst) {
            Err(HostInputError::Platform("mock failure".into()))
        } else {
            Ok(())
        }
    }

    fn record(&self, action: RecordedAction) -> Result<(), HostInputError> {
        self.check()?;
        self.lock().actions.push(action);
        Ok(())
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl HostInputSink for RecordingSink {
    fn screen_size(&self) -> Result<(u32, u32), HostInputError> {
        self.check()?;
        Ok(self.screen)
    }

    fn pointer_position(&self) -> Result<(i32, i32), HostInputError> {
        self.check()?;
        Ok(self.lock().pointer)
    }

    fn move_smooth(&self, x: i32, y: i32, _duration: Duration) -> Result<(), HostInputError> {
        self.check()?;
        let mut state = self.lock();
        state.pointer = (x, y);
        state.actions.push(RecordedAction::MoveSmooth { x, y });
        Ok(())
    }

    fn click(&self, button: &str) -> Result<(), HostInputError> {
        self.record(RecordedAction::Click(button.to_string()))
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), HostInputError> {
        self.record(RecordedAction::Scroll { dx, dy })
    }

    fn key_toggle(&self, key: Key, state: KeyState) -> Result<(), HostInputError> {
        self.record(RecordedAction::KeyToggle(key, state))
    }

    fn key_tap(&self, key: Key, modifiers: &[Key]) -> Result<(), HostInputError> {
        self.record(RecordedAction::KeyTap {
            key,
            modifiers: modifiers.to_vec(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
