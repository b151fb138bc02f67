//! Call-level error taxonomy.
//!
//! Every failure an invoker can report for a single call is an
//! [`InvokeError`] carried in the error slot of an [`crate::RpcResult`].
//! Nothing is thrown across the `invoke` boundary.

use std::sync::Arc;

use thiserror::Error;

/// Shared, type-erased error returned by a remote callable.
///
/// Kept behind an `Arc` so the error can be copied into results and logs
/// without losing the concrete type; callers recover it with
/// `downcast_ref` on [`InvokeError::as_remote`].
pub type RemoteError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported through the error slot of an [`crate::RpcResult`].
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    /// The invocation carried no reply container.
    ///
    /// Set before the remote call is attempted. Depending on the invoker's
    /// configuration the call may still be performed.
    #[error("request need @response")]
    MissingReply,

    /// The method name did not resolve on the connected service stub.
    ///
    /// A registration error rather than a network condition: no callable was
    /// run.
    #[error("method '{method}' not found on service stub")]
    MethodNotFound {
        /// The name that failed to resolve.
        method: String,
    },

    /// The remote callable returned an error; carried verbatim.
    #[error("{0}")]
    Remote(RemoteError),

    /// The codec could not populate the reply container.
    ///
    /// Only surfaced when the invoker is configured to do so; swallowed
    /// (and logged) otherwise.
    #[error("failed to decode reply: {message}")]
    Decode {
        /// Description of the codec failure.
        message: String,
    },
}

impl InvokeError {
    /// Returns the remote error, if this is [`InvokeError::Remote`].
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(e) => Some(e),
            _ => None,
        }
    }

    /// Returns `true` for [`InvokeError::MissingReply`].
    pub fn is_missing_reply(&self) -> bool {
        matches!(self, Self::MissingReply)
    }
}
