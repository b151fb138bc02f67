//! Normalized call outcome.

use std::collections::HashMap;

use serde_json::Value;

use crate::InvokeError;

/// Outcome of one invocation: a return-value slot, an error slot, and
/// attachments.
///
/// On success the decoded reply lives in the caller's reply container; the
/// raw payload is kept in [`RpcResult::rest`] for callers that want it.
#[derive(Debug, Clone, Default)]
pub struct RpcResult {
    rest: Option<Value>,
    error: Option<InvokeError>,
    attachments: HashMap<String, String>,
}

impl RpcResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw return payload, if one was recorded.
    pub fn rest(&self) -> Option<&Value> {
        self.rest.as_ref()
    }

    pub fn set_rest(&mut self, value: Value) {
        self.rest = Some(value);
    }

    /// Returns the error, if the call failed.
    pub fn error(&self) -> Option<&InvokeError> {
        self.error.as_ref()
    }

    /// Sets the error, replacing any previous one.
    pub fn set_error(&mut self, error: InvokeError) {
        self.error = Some(error);
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn attachments(&self) -> &HashMap<String, String> {
        &self.attachments
    }

    pub fn set_attachment(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attachments.insert(key.into(), value.into());
    }

    /// Converts into a standard `Result`, discarding attachments.
    ///
    /// An `Ok` carries the raw payload, which is `None` when no call
    /// completed.
    pub fn into_result(self) -> Result<Option<Value>, InvokeError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.rest),
        }
    }
}
