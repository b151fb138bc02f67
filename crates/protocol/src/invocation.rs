//! Invocation requests and reply containers.
//!
//! An [`Invocation`] is the caller's read-only description of one call: the
//! method name, the ordered argument values, string attachments, and an
//! optional reply container the invoker fills with the decoded reply.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Reply containers
// ---------------------------------------------------------------------------

/// A caller-supplied container that receives a decoded reply.
///
/// Object-safe so an [`Invocation`] can carry any typed container behind
/// `&mut dyn ReplySlot`.
pub trait ReplySlot {
    /// Populates the container from a decoded payload value.
    fn fill(&mut self, value: Value) -> Result<(), serde_json::Error>;

    /// Returns `true` once the container holds a value.
    fn is_filled(&self) -> bool;
}

/// Typed reply container.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    value: Option<T>,
}

impl<T> Reply<T> {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Returns the decoded value, if any.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consumes the container, returning the decoded value.
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for Reply<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> ReplySlot for Reply<T> {
    fn fill(&mut self, value: Value) -> Result<(), serde_json::Error> {
        self.value = Some(serde_json::from_value(value)?);
        Ok(())
    }

    fn is_filled(&self) -> bool {
        self.value.is_some()
    }
}

// ---------------------------------------------------------------------------
// Invocation capability
// ---------------------------------------------------------------------------

/// What an invoker reads from a call request.
pub trait Invocation {
    /// Exact name of the method to call.
    fn method_name(&self) -> &str;

    /// Ordered argument values.
    fn parameter_values(&self) -> &[Value];

    /// String attachments propagated to the call context.
    fn attachments(&self) -> &HashMap<String, String>;

    /// The reply container, or `None` when the caller supplied none.
    fn reply(&mut self) -> Option<&mut dyn ReplySlot>;
}

/// Concrete invocation built by the framework for each outbound call.
///
/// The reply container is borrowed for `'r`; once the invocation is dropped
/// the caller reads the decoded value straight from its own [`Reply`].
pub struct RpcInvocation<'r> {
    method_name: String,
    arguments: Vec<Value>,
    attachments: HashMap<String, String>,
    reply: Option<&'r mut dyn ReplySlot>,
}

impl<'r> RpcInvocation<'r> {
    /// Creates an invocation with no reply container and no attachments.
    pub fn new(method_name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            method_name: method_name.into(),
            arguments,
            attachments: HashMap::new(),
            reply: None,
        }
    }

    /// Attaches the container that receives the decoded reply.
    #[must_use]
    pub fn with_reply(mut self, reply: &'r mut dyn ReplySlot) -> Self {
        self.reply = Some(reply);
        self
    }

    /// Adds or replaces an attachment.
    #[must_use]
    pub fn with_attachment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attachments.insert(key.into(), value.into());
        self
    }

    /// Returns `true` when a reply container is present.
    pub fn has_reply(&self) -> bool {
        self.reply.is_some()
    }
}

impl Invocation for RpcInvocation<'_> {
    fn method_name(&self) -> &str {
        &self.method_name
    }

    fn parameter_values(&self) -> &[Value] {
        &self.arguments
    }

    fn attachments(&self) -> &HashMap<String, String> {
        &self.attachments
    }

    fn reply(&mut self) -> Option<&mut dyn ReplySlot> {
        self.reply.as_mut().map(|r| &mut **r as &mut dyn ReplySlot)
    }
}

impl std::fmt::Debug for RpcInvocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcInvocation")
            .field("method_name", &self.method_name)
            .field("arguments", &self.arguments)
            .field("attachments", &self.attachments)
            .field("has_reply", &self.reply.is_some())
            .finish()
    }
}
