//! Reply codec capability.
//!
//! A [`Codec`] turns a raw return payload into the caller's typed reply
//! container. The invoker calls it only after a successful remote call.

use protocol::ReplySlot;
use serde_json::Value;
use thiserror::Error;

/// Errors produced while decoding a reply.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload did not match the shape of the reply container.
    #[error("payload does not fit reply container: {0}")]
    Mismatch(#[from] serde_json::Error),
}

/// Decodes a raw return payload into a reply container.
pub trait Codec: Send + Sync {
    fn decode(&self, payload: &Value, reply: &mut dyn ReplySlot) -> Result<(), CodecError>;
}

/// Codec for payloads that are already JSON values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode(&self, payload: &Value, reply: &mut dyn ReplySlot) -> Result<(), CodecError> {
        reply.fill(payload.clone())?;
        Ok(())
    }
}
