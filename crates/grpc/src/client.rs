//! Connected client: a connection handle paired with its service stub.

use std::sync::Arc;

use crate::connection::{Connection, ConnectionError, ConnectivityState};
use crate::stub::{Callable, ServiceStub};

/// A service stub bound to the connection it calls through.
///
/// Cheap to clone; clones share the same connection.
#[derive(Clone)]
pub struct Client {
    connection: Arc<dyn Connection>,
    stub: Arc<ServiceStub>,
}

impl Client {
    pub fn new(connection: Arc<dyn Connection>, stub: ServiceStub) -> Self {
        Self {
            connection,
            stub: Arc::new(stub),
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.connection.state()
    }

    pub fn close(&self) -> Result<(), ConnectionError> {
        self.connection.close()
    }

    /// Resolves a callable by exact method name.
    pub fn resolve(&self, method: &str) -> Option<&Callable> {
        self.stub.resolve(method)
    }

    pub fn stub(&self) -> &ServiceStub {
        &self.stub
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state())
            .field("stub", &self.stub)
            .finish()
    }
}
