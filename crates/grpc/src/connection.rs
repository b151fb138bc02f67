//! Connection-handle capability.
//!
//! The transport that owns the socket implements [`Connection`]; the invoker
//! only reads its connectivity state and asks it to close once.

use thiserror::Error;

/// Connectivity state of a client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectivityState {
    /// No activity and no pending connection attempt.
    Idle,
    /// A connection attempt is in progress.
    Connecting,
    /// Connected and ready to carry calls.
    Ready,
    /// The last attempt failed; the transport may retry.
    TransientFailure,
    /// Closed. Terminal.
    Shutdown,
}

impl ConnectivityState {
    pub fn is_shutdown(self) -> bool {
        self == Self::Shutdown
    }
}

impl std::fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Connecting => "CONNECTING",
            Self::Ready => "READY",
            Self::TransientFailure => "TRANSIENT_FAILURE",
            Self::Shutdown => "SHUTDOWN",
        };
        f.write_str(s)
    }
}

/// Errors reported by [`Connection::close`].
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The connection was already closed.
    #[error("connection already closed")]
    AlreadyClosed,

    /// The transport failed while shutting down.
    #[error("transport error while closing: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
}

/// A live client connection shared between invokers.
pub trait Connection: Send + Sync {
    /// Current connectivity state.
    fn state(&self) -> ConnectivityState;

    /// Closes the connection. After a successful close, [`Connection::state`]
    /// reports [`ConnectivityState::Shutdown`].
    fn close(&self) -> Result<(), ConnectionError>;
}
