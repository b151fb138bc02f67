//! The dynamic-dispatch invoker.
//!
//! [`GrpcInvoker`] turns a generic [`Invocation`] into a call on the
//! connected [`Client`]'s stub and folds the outcome into an [`RpcResult`].
//!
//! ## Call path
//!
//! 1. A missing reply container sets [`InvokeError::MissingReply`]. Unless
//!    [`GrpcInvokerConfig::reject_missing_reply`] is set the call still goes
//!    out.
//! 2. A [`CallContext`] is built ahead of the invocation's arguments.
//! 3. The callable is resolved by exact method name; an unknown name fails the
//!    call with [`InvokeError::MethodNotFound`] and nothing is run.
//! 4. The callable runs synchronously on the calling thread.
//! 5. A remote error replaces whatever error is already set and the reply
//!    container is left untouched. On success the payload is decoded into
//!    the reply container and kept as the result's raw return value.
//!
//! ## Teardown
//!
//! `destroy` runs its body through a [`Once`]. The first caller marks the
//! base invoker destroyed and closes the connection; concurrent callers block
//! until that body has finished, so every `destroy` returns with the
//! teardown complete.

use std::sync::{Arc, Once};

use protocol::{BaseInvoker, Invocation, InvokeError, Invoker, RpcResult, Url};

use crate::client::Client;
use crate::codec::{Codec, JsonCodec};
use crate::config::GrpcInvokerConfig;
use crate::stub::CallContext;

/// Result attachment carrying the call id of the performed call.
pub const CALL_ID_ATTACHMENT: &str = "call_id";

/// Invoker bound to one endpoint and one connected client.
pub struct GrpcInvoker {
    base: BaseInvoker,
    quit_once: Once,
    client: Client,
    codec: Arc<dyn Codec>,
    config: GrpcInvokerConfig,
}

impl GrpcInvoker {
    /// Creates an invoker with the JSON codec and default configuration.
    pub fn new(url: Url, client: Client) -> Self {
        Self {
            base: BaseInvoker::new(url),
            quit_once: Once::new(),
            client,
            codec: Arc::new(JsonCodec),
            config: GrpcInvokerConfig::default(),
        }
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: GrpcInvokerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base(&self) -> &BaseInvoker {
        &self.base
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> GrpcInvokerConfig {
        self.config
    }
}

impl Invoker for GrpcInvoker {
    fn url(&self) -> &Url {
        self.base.url()
    }

    fn invoke(&self, invocation: &mut dyn Invocation) -> RpcResult {
        let method = invocation.method_name().to_owned();
        let span = tracing::debug_span!("invoke", url = %self.base.url(), method = %method);
        let _guard = span.enter();

        let mut result = RpcResult::new();

        if invocation.reply().is_none() {
            result.set_error(InvokeError::MissingReply);
            if self.config.reject_missing_reply {
                tracing::warn!("Invocation has no reply container, rejecting call");
                return result;
            }
            tracing::warn!("Invocation has no reply container, calling anyway");
        }

        let ctx = CallContext::new(self.base.url().clone(), invocation.attachments().clone());

        let Some(callable) = self.client.resolve(&method) else {
            tracing::error!(
                registered = ?self.client.stub().method_names(),
                "Method not found on service stub"
            );
            result.set_error(InvokeError::MethodNotFound { method });
            return result;
        };

        tracing::debug!(call_id = %ctx.call_id(), "Calling remote method");
        result.set_attachment(CALL_ID_ATTACHMENT, ctx.call_id().to_string());

        match callable(&ctx, invocation.parameter_values()) {
            Ok(payload) => {
                if let Some(reply) = invocation.reply() {
                    if let Err(e) = self.codec.decode(&payload, reply) {
                        tracing::warn!(error = %e, "Failed to decode reply");
                        if self.config.surface_decode_errors {
                            result.set_error(InvokeError::Decode {
                                message: e.to_string(),
                            });
                        }
                    }
                }
                result.set_rest(payload);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Remote method returned an error");
                result.set_error(InvokeError::Remote(e));
            }
        }

        result
    }

    fn is_available(&self) -> bool {
        self.base.is_available() && !self.client.state().is_shutdown()
    }

    // Both conditions must hold: a destroyed base over a live connection is
    // not reported as destroyed.
    fn is_destroyed(&self) -> bool {
        self.base.is_destroyed() && self.client.state().is_shutdown()
    }

    fn destroy(&self) {
        if self.quit_once.is_completed() {
            tracing::trace!(url = %self.base.url(), "Invoker already destroyed");
            return;
        }

        self.quit_once.call_once(|| {
            self.base.destroy();
            if let Err(e) = self.client.close() {
                tracing::warn!(url = %self.base.url(), error = %e, "Ignoring connection close failure");
            }
            tracing::info!(url = %self.base.url(), "Invoker destroyed");
        });
    }
}

impl std::fmt::Debug for GrpcInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcInvoker")
            .field("url", self.base.url())
            .field("destroyed", &self.quit_once.is_completed())
            .field("client", &self.client)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Barrier, Mutex};
    use std::time::Duration;

    use protocol::{MethodName, RemoteError, Reply, ReplySlot, RpcInvocation};
    use serde_json::{json, Value};
    use thiserror::Error;

    use super::*;
    use crate::connection::{Connection, ConnectionError, ConnectivityState};
    use crate::loopback::LoopbackConnection;
    use crate::stub::ServiceStub;

    #[derive(Debug, Error)]
    #[error("unavailable: {0}")]
    struct Unavailable(String);

    fn url() -> Url {
        Url::new("grpc", "127.0.0.1", 20000)
    }

    fn stub(calls: Arc<AtomicUsize>) -> ServiceStub {
        let echo_calls = Arc::clone(&calls);
        ServiceStub::new()
            .with_method(MethodName::new("Echo").unwrap(), move |_ctx, args| {
                echo_calls.fetch_add(1, Ordering::SeqCst);
                Ok(args.first().cloned().unwrap_or(Value::Null))
            })
            .with_method(MethodName::new("Fail").unwrap(), move |_ctx, _args| {
                calls.fetch_add(1, Ordering::SeqCst);
                let err: RemoteError = Arc::new(Unavailable("backend down".into()));
                Err(err)
            })
            .with_method(MethodName::new("Tenant").unwrap(), |ctx, _args| {
                Ok(json!(ctx.attachment("tenant")))
            })
    }

    fn invoker_with(conn: Arc<LoopbackConnection>) -> (GrpcInvoker, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = Client::new(conn, stub(Arc::clone(&calls)));
        (GrpcInvoker::new(url(), client), calls)
    }

    fn invoker() -> (GrpcInvoker, Arc<AtomicUsize>) {
        invoker_with(Arc::new(LoopbackConnection::new()))
    }

    #[test]
    fn successful_call_fills_reply() {
        let (invoker, _) = invoker();
        let mut reply = Reply::<String>::new();
        let mut inv = RpcInvocation::new("Echo", vec![json!("hello")]).with_reply(&mut reply);

        let result = invoker.invoke(&mut inv);

        assert!(result.error().is_none());
        assert_eq!(result.rest(), Some(&json!("hello")));
        assert!(result.attachments().contains_key(CALL_ID_ATTACHMENT));
        assert_eq!(reply.get().map(String::as_str), Some("hello"));
    }

    #[test]
    fn remote_error_is_propagated_and_reply_untouched() {
        let (invoker, _) = invoker();
        let mut reply = Reply::<String>::new();
        let mut inv = RpcInvocation::new("Fail", Vec::new()).with_reply(&mut reply);

        let result = invoker.invoke(&mut inv);

        let remote = result.error().and_then(InvokeError::as_remote).unwrap();
        assert_eq!(
            remote.downcast_ref::<Unavailable>().map(|e| e.0.as_str()),
            Some("backend down")
        );
        assert!(result.rest().is_none());
        assert!(!reply.is_filled());
    }

    #[test]
    fn missing_reply_is_reported_but_call_still_made() {
        let (invoker, calls) = invoker();
        let mut inv = RpcInvocation::new("Echo", vec![json!("hello")]);

        let result = invoker.invoke(&mut inv);

        assert!(result.error().unwrap().is_missing_reply());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.rest(), Some(&json!("hello")));
    }

    #[test]
    fn missing_reply_is_replaced_by_remote_error() {
        let (invoker, calls) = invoker();
        let mut inv = RpcInvocation::new("Fail", Vec::new());

        let result = invoker.invoke(&mut inv);

        assert!(result.error().unwrap().as_remote().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_reply_can_be_rejected_before_calling() {
        let (invoker, calls) = invoker();
        let invoker = invoker.with_config(GrpcInvokerConfig {
            reject_missing_reply: true,
            ..Default::default()
        });
        let mut inv = RpcInvocation::new("Echo", vec![json!("hello")]);

        let result = invoker.invoke(&mut inv);

        assert!(result.error().unwrap().is_missing_reply());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(result.rest().is_none());
    }

    #[test]
    fn unknown_method_fails_without_calling() {
        let (invoker, calls) = invoker();
        let mut reply = Reply::<String>::new();
        let mut inv = RpcInvocation::new("echo", vec![json!("hello")]).with_reply(&mut reply);

        let result = invoker.invoke(&mut inv);

        assert!(matches!(
            result.error(),
            Some(InvokeError::MethodNotFound { method }) if method == "echo"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!reply.is_filled());
    }

    #[test]
    fn decode_failure_is_swallowed_by_default() {
        let (invoker, _) = invoker();
        let mut reply = Reply::<u64>::new();
        let mut inv = RpcInvocation::new("Echo", vec![json!("not a number")]).with_reply(&mut reply);

        let result = invoker.invoke(&mut inv);

        assert!(result.error().is_none());
        assert_eq!(result.rest(), Some(&json!("not a number")));
        assert!(!reply.is_filled());
    }

    #[test]
    fn decode_failure_can_be_surfaced() {
        let (invoker, _) = invoker();
        let invoker = invoker.with_config(GrpcInvokerConfig {
            surface_decode_errors: true,
            ..Default::default()
        });
        let mut reply = Reply::<u64>::new();
        let mut inv = RpcInvocation::new("Echo", vec![json!("not a number")]).with_reply(&mut reply);

        let result = invoker.invoke(&mut inv);

        assert!(matches!(result.error(), Some(InvokeError::Decode { .. })));
    }

    #[test]
    fn attachments_reach_the_call_context() {
        let (invoker, _) = invoker();
        let mut reply = Reply::<Option<String>>::new();
        let mut inv = RpcInvocation::new("Tenant", Vec::new())
            .with_attachment("tenant", "blue")
            .with_reply(&mut reply);

        let result = invoker.invoke(&mut inv);

        assert!(result.is_ok());
        assert_eq!(reply.into_inner(), Some(Some("blue".to_string())));
    }

    #[test]
    fn availability_follows_connection_and_base_flag() {
        let conn = Arc::new(LoopbackConnection::new());
        let (invoker, _) = invoker_with(Arc::clone(&conn));
        assert!(invoker.is_available());

        for state in [
            ConnectivityState::Idle,
            ConnectivityState::Connecting,
            ConnectivityState::TransientFailure,
        ] {
            conn.set_state(state);
            assert!(invoker.is_available(), "{state}");
        }

        conn.set_state(ConnectivityState::Shutdown);
        assert!(!invoker.is_available());

        conn.set_state(ConnectivityState::Ready);
        invoker.base().set_available(false);
        assert!(!invoker.is_available());
    }

    #[test]
    fn destroyed_requires_both_flag_and_shutdown() {
        let conn = Arc::new(LoopbackConnection::new());
        let (invoker, _) = invoker_with(Arc::clone(&conn));

        conn.set_state(ConnectivityState::Shutdown);
        assert!(!invoker.is_destroyed(), "connection shut down, base live");

        conn.set_state(ConnectivityState::Ready);
        invoker.base().destroy();
        assert!(!invoker.is_destroyed(), "base destroyed, connection ready");

        conn.set_state(ConnectivityState::Shutdown);
        assert!(invoker.is_destroyed());
        assert!(!invoker.is_available());
    }

    #[test]
    fn destroy_closes_connection_once() {
        let conn = Arc::new(LoopbackConnection::new());
        let (invoker, _) = invoker_with(Arc::clone(&conn));

        invoker.destroy();
        invoker.destroy();

        assert_eq!(conn.close_calls(), 1);
        assert!(invoker.is_destroyed());
        assert!(!invoker.is_available());
    }

    #[test]
    fn destroy_ignores_close_errors() {
        let conn = Arc::new(LoopbackConnection::new().failing_close());
        let (invoker, _) = invoker_with(Arc::clone(&conn));

        invoker.destroy();

        assert_eq!(conn.close_calls(), 1);
        assert!(invoker.is_destroyed());
    }

    #[test]
    fn concurrent_destroy_closes_once() {
        const CALLERS: usize = 16;
        let conn = Arc::new(LoopbackConnection::new().failing_close());
        let (invoker, _) = invoker_with(Arc::clone(&conn));
        let barrier = Barrier::new(CALLERS);

        std::thread::scope(|s| {
            for _ in 0..CALLERS {
                s.spawn(|| {
                    barrier.wait();
                    invoker.destroy();
                });
            }
        });

        assert_eq!(conn.close_calls(), 1);
        assert!(invoker.is_destroyed());
    }

    /// Connection whose close waits at a rendezvous and then takes a while.
    struct SlowClose {
        state: Mutex<ConnectivityState>,
        entered: Barrier,
    }

    impl Connection for SlowClose {
        fn state(&self) -> ConnectivityState {
            *self.state.lock().unwrap()
        }

        fn close(&self) -> Result<(), ConnectionError> {
            self.entered.wait();
            std::thread::sleep(Duration::from_millis(200));
            *self.state.lock().unwrap() = ConnectivityState::Shutdown;
            Ok(())
        }
    }

    #[test]
    fn destroy_waits_for_in_flight_teardown() {
        let conn = Arc::new(SlowClose {
            state: Mutex::new(ConnectivityState::Ready),
            entered: Barrier::new(2),
        });
        let client = Client::new(Arc::clone(&conn) as Arc<dyn Connection>, stub(Arc::default()));
        let invoker = GrpcInvoker::new(url(), client);

        std::thread::scope(|s| {
            s.spawn(|| invoker.destroy());

            // Released once the first destroy is inside close().
            conn.entered.wait();
            invoker.destroy();
            assert!(invoker.is_destroyed());
            assert!(!invoker.is_available());
        });
    }
}
