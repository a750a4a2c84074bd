//! Cross-instance relay: capability traits, envelope, and the default impl.
//!
//! Peer server instances are loosely coupled through an external pub/sub
//! bus. Every locally published message is wrapped in an [`Envelope`]
//! tagged with the publishing instance's id; each peer's ingress discards
//! envelopes carrying its own id and hands the rest to the hub's local-only
//! cast. The tag, not any field on the message, is what stops a broadcast
//! from reflecting between instances forever.
//!
//! ## Contents
//! - [`Relay`] what the hub holds: publish/start/stop/available
//! - [`BroadcastTarget`] what the relay holds: the hub's local-only ingress
//! - [`Envelope`] the bus payload
//! - [`BusRelay`] default relay over a pluggable [`RelayTransport`]
//! - [`MemoryBus`]/[`MemoryTransport`] in-process loopback transport
//!
//! Wire transports (Redis, NATS, ...) live in the embedding application as
//! [`RelayTransport`] implementations; the core never sees them.

mod bus;
mod transport;

pub use bus::BusRelay;
pub use transport::{MemoryBus, MemoryTransport, RelayTransport};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::messages::Message;

/// Cross-instance publish/subscribe capability attached to a hub.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Wraps `msg` in an envelope and sends it to the shared topic.
    async fn publish(&self, msg: &Message) -> Result<(), RelayError>;

    /// Connects, subscribes to the shared topic, marks the relay available,
    /// and starts the ingress task.
    ///
    /// Failure leaves the relay unavailable; the hub keeps running
    /// standalone, so callers must treat this as non-fatal.
    async fn start(&self) -> Result<(), RelayError>;

    /// Marks the relay unavailable, cancels the ingress task, awaits its
    /// exit, and closes the transport.
    async fn stop(&self) -> Result<(), RelayError>;

    /// True between a successful `start` and any `stop`.
    fn available(&self) -> bool;
}

/// Receiver of relayed messages; implemented by the hub.
///
/// Delivery lands on the hub's local-only cast queue, which fans out to
/// local subscribers but never re-enters the relay.
#[async_trait]
pub trait BroadcastTarget: Send + Sync {
    async fn broadcast_to_local(&self, msg: Message);
}

/// Bus payload: a message tagged with its originating instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Per-process unique id of the publishing instance.
    pub instance_id: String,
    /// The broadcast message.
    pub message: Message,
}
