//! Dynamic-dispatch invoker adapter.
//!
//! Implements the [`protocol::Invoker`] port on top of a connected client:
//! the method named by an invocation is resolved in an explicit dispatch
//! table ([`ServiceStub`]), executed synchronously with a call-scoped
//! [`CallContext`], and its outcome normalized into a [`protocol::RpcResult`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Connection state, stub dispatch, and reply decoding
//! live here. The framework sees only [`protocol::Invoker`].
//!
//! ## Collaborators
//!
//! | Capability | Trait | Provided here |
//! |------------|-------|---------------|
//! | Connection handle | [`Connection`] | [`LoopbackConnection`] (in-process) |
//! | Method resolution | [`ServiceStub`] | registration by name |
//! | Reply decoding | [`Codec`] | [`JsonCodec`] |

pub mod client;
pub mod codec;
pub mod config;
pub mod connection;
pub mod invoker;
pub mod loopback;
pub mod stub;

pub use client::Client;
pub use codec::{Codec, CodecError, JsonCodec};
pub use config::{ConfigError, GrpcInvokerConfig};
pub use connection::{Connection, ConnectionError, ConnectivityState};
pub use invoker::{GrpcInvoker, CALL_ID_ATTACHMENT};
pub use loopback::LoopbackConnection;
pub use stub::{CallContext, Callable, ServiceStub};
