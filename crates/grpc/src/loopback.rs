//! In-process connection used by tests and the demo binary.
//!
//! Callables registered on a stub run in the caller's thread, so a
//! [`LoopbackConnection`] only has to model connectivity state and close.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::connection::{Connection, ConnectionError, ConnectivityState};

/// Connection whose state is set by hand.
#[derive(Debug)]
pub struct LoopbackConnection {
    state: Mutex<ConnectivityState>,
    close_calls: AtomicUsize,
    fail_close: bool,
}

impl LoopbackConnection {
    /// Creates a connection in [`ConnectivityState::Ready`].
    pub fn new() -> Self {
        Self::with_state(ConnectivityState::Ready)
    }

    pub fn with_state(state: ConnectivityState) -> Self {
        Self {
            state: Mutex::new(state),
            close_calls: AtomicUsize::new(0),
            fail_close: false,
        }
    }

    /// Makes every `close` report a transport error. The state still moves to
    /// shutdown.
    #[must_use]
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn set_state(&self, state: ConnectivityState) {
        *self.lock_state() = state;
    }

    /// Number of times `close` has been called.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ConnectivityState> {
        // State is a plain enum; a poisoned lock still holds a valid value.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for LoopbackConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for LoopbackConnection {
    fn state(&self) -> ConnectivityState {
        *self.lock_state()
    }

    fn close(&self) -> Result<(), ConnectionError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock_state();
        if state.is_shutdown() {
            return Err(ConnectionError::AlreadyClosed);
        }
        *state = ConnectivityState::Shutdown;
        if self.fail_close {
            return Err(ConnectionError::Transport {
                message: "loopback close failure".into(),
            });
        }
        Ok(())
    }
}
