//! Explicit dispatch table for a generated service stub.
//!
//! A code generator (or a hand-written registration block) maps every remote
//! method name to a [`Callable`]. The invoker resolves the callable by exact
//! name at call time; nothing is discovered by introspection.

use std::collections::HashMap;
use std::sync::Arc;

use protocol::{CallId, MethodName, RemoteError, Url};
use serde_json::Value;

/// Call-scoped context handed to a callable ahead of the invocation's
/// arguments.
#[derive(Debug, Clone)]
pub struct CallContext {
    call_id: CallId,
    url: Url,
    attachments: HashMap<String, String>,
}

impl CallContext {
    /// Creates a context with a fresh call id.
    pub fn new(url: Url, attachments: HashMap<String, String>) -> Self {
        Self {
            call_id: CallId::new_random(),
            url,
            attachments,
        }
    }

    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    /// Endpoint the call is addressed to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn attachment(&self, key: &str) -> Option<&str> {
        self.attachments.get(key).map(String::as_str)
    }

    pub fn attachments(&self) -> &HashMap<String, String> {
        &self.attachments
    }
}

/// One remote method: `(context, arguments) -> payload | error`.
///
/// Blocks until the remote call completes.
pub type Callable =
    Arc<dyn Fn(&CallContext, &[Value]) -> Result<Value, RemoteError> + Send + Sync + 'static>;

/// Name-to-callable dispatch table for one service.
#[derive(Clone, Default)]
pub struct ServiceStub {
    methods: HashMap<MethodName, Callable>,
}

impl ServiceStub {
    /// Creates an empty stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callable` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: MethodName, callable: F)
    where
        F: Fn(&CallContext, &[Value]) -> Result<Value, RemoteError> + Send + Sync + 'static,
    {
        self.methods.insert(name, Arc::new(callable));
    }

    /// Builder form of [`ServiceStub::register`].
    #[must_use]
    pub fn with_method<F>(mut self, name: MethodName, callable: F) -> Self
    where
        F: Fn(&CallContext, &[Value]) -> Result<Value, RemoteError> + Send + Sync + 'static,
    {
        self.register(name, callable);
        self
    }

    /// Resolves a callable by exact, case-sensitive name.
    pub fn resolve(&self, name: &str) -> Option<&Callable> {
        self.methods.get(name)
    }

    /// Names of all registered methods, sorted.
    pub fn method_names(&self) -> Vec<&MethodName> {
        let mut names: Vec<_> = self.methods.keys().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl std::fmt::Debug for ServiceStub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceStub")
            .field("methods", &self.method_names())
            .finish()
    }
}
