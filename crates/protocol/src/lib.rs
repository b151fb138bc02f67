//! Framework-facing invocation domain.
//!
//! This crate contains every type the RPC framework exchanges with a protocol
//! adapter: endpoint identity, invocation requests, reply containers,
//! normalized results, the call-level error taxonomy, and the [`Invoker`]
//! port. Adapter crates implement [`Invoker`]; they never add types the
//! framework has to know about.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`MethodName`, `ServicePath`, `CallId`) |
//! | [`url`] | Endpoint identity ([`Url`]) |
//! | [`invocation`] | [`Invocation`] capability, [`RpcInvocation`], reply containers |
//! | [`result`] | [`RpcResult`] |
//! | [`errors`] | [`InvokeError`] |
//! | [`invoker`] | [`Invoker`] trait and [`BaseInvoker`] |

pub mod errors;
pub mod identifiers;
pub mod invocation;
pub mod invoker;
pub mod result;
pub mod url;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{InvokeError, RemoteError};
pub use identifiers::{CallId, MethodName, ServicePath};
pub use invocation::{Invocation, Reply, ReplySlot, RpcInvocation};
pub use invoker::{BaseInvoker, Invoker};
pub use result::RpcResult;
pub use url::Url;
