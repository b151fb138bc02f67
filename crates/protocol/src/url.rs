//! Endpoint identity.
//!
//! A [`Url`] names one remote endpoint: the protocol used to reach it, its
//! network location, the service path it exposes, and free-form parameters.
//! Parsing URL strings belongs to the registry and configuration layers; this
//! type is only built programmatically and rendered for logs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ServicePath;

/// Identity of one remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Url {
    protocol: String,
    host: String,
    port: u16,
    path: Option<ServicePath>,
    #[serde(default)]
    params: BTreeMap<String, String>,
}

impl Url {
    /// Creates a URL for `protocol://host:port` with no path and no parameters.
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port,
            path: None,
            params: BTreeMap::new(),
        }
    }

    /// Sets the service path.
    #[must_use]
    pub fn with_path(mut self, path: ServicePath) -> Self {
        self.path = Some(path);
        self
    }

    /// Adds or replaces a parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns `host:port`.
    pub fn location(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn path(&self) -> Option<&ServicePath> {
        self.path.as_ref()
    }

    /// Returns a parameter value, if present.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl std::fmt::Display for Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}:{}", self.protocol, self.host, self.port)?;
        if let Some(path) = &self.path {
            write!(f, "/{path}")?;
        }
        let mut sep = '?';
        for (k, v) in &self.params {
            write!(f, "{sep}{k}={v}")?;
            sep = '&';
        }
        Ok(())
    }
}
