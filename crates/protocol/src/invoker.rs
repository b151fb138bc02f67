//! The `Invoker` port and its shared base state.
//!
//! Protocol adapters implement [`Invoker`]; the framework's routing and
//! health logic only ever sees `Arc<dyn Invoker>`. [`BaseInvoker`] carries the
//! state every adapter shares: endpoint identity plus the availability and
//! destroyed flags.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{Invocation, RpcResult, Url};

/// A callable endpoint.
///
/// `invoke` may be called concurrently from many threads and blocks its
/// caller until the remote call finishes. `destroy` may also race; adapters
/// guarantee their teardown body runs at most once.
pub trait Invoker: Send + Sync {
    /// Identity of the endpoint this invoker calls.
    fn url(&self) -> &Url;

    /// Performs one call. All failures are reported through the result.
    fn invoke(&self, invocation: &mut dyn Invocation) -> RpcResult;

    /// Whether the invoker can accept new calls.
    fn is_available(&self) -> bool;

    /// Whether the invoker has been torn down.
    fn is_destroyed(&self) -> bool;

    /// Tears the invoker down. Idempotent; never fails.
    fn destroy(&self);
}

/// State shared by every protocol adapter.
#[derive(Debug)]
pub struct BaseInvoker {
    url: Url,
    available: AtomicBool,
    destroyed: AtomicBool,
}

impl BaseInvoker {
    /// Creates an available, live base invoker for `url`.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            available: AtomicBool::new(true),
            destroyed: AtomicBool::new(false),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Explicitly enables or disables the invoker for new calls.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// Marks the invoker destroyed and no longer available.
    pub fn destroy(&self) {
        tracing::debug!(url = %self.url, "Destroying base invoker");
        self.destroyed.store(true, Ordering::Release);
        self.available.store(false, Ordering::Release);
    }
}
