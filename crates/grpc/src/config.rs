//! Invoker configuration.
//!
//! Both switches default to `false`, which reproduces the reference
//! behaviour: a missing reply container is reported but the call still goes
//! out, and codec failures are logged but not reported.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a [`GrpcInvokerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON or has unknown fields.
    #[error("invalid invoker configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Behavioural switches for [`crate::GrpcInvoker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrpcInvokerConfig {
    /// Return immediately, without calling, when the invocation has no reply
    /// container.
    pub reject_missing_reply: bool,

    /// Report codec failures as [`protocol::InvokeError::Decode`].
    pub surface_decode_errors: bool,
}

impl GrpcInvokerConfig {
    /// Parses a configuration from a JSON document. Missing fields take their
    /// defaults.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }
}
