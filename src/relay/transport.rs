//! # Relay transports.
//!
//! [`RelayTransport`] is the seam that keeps bus wire protocols out of the
//! core. [`MemoryBus`] + [`MemoryTransport`] provide an in-process loopback:
//! transports built over the same bus form one broadcast namespace, which is
//! all single-process deployments and the test suite need.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::warn;

use crate::error::RelayError;

/// Per-subscriber delivery queue depth on the in-process bus.
const MEMORY_SUBSCRIBER_CAPACITY: usize = 64;

/// Raw topic-addressed pub/sub transport.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Verifies the bus is reachable.
    async fn connect(&self) -> Result<(), RelayError>;

    /// Sends one payload to every current subscriber of `topic`.
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), RelayError>;

    /// Subscribes to `topic`, returning the delivery queue. Payloads
    /// published before the subscription are not replayed.
    async fn subscribe(&self, topic: &str) -> Result<mpsc::Receiver<Vec<u8>>, RelayError>;

    /// Releases the transport. Subscriptions end when their queues drain.
    async fn close(&self) -> Result<(), RelayError>;
}

/// In-process topic registry shared by [`MemoryTransport`] peers.
pub struct MemoryBus {
    topics: Mutex<HashMap<String, Vec<mpsc::Sender<Vec<u8>>>>>,
}

impl MemoryBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            topics: Mutex::new(HashMap::new()),
        })
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) {
        let mut topics = self.topics.lock().await;
        let Some(subscribers) = topics.get_mut(topic) else {
            return;
        };
        subscribers.retain(|tx| match tx.try_send(payload.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(topic = %topic, "bus subscriber lagging, dropping payload");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }

    async fn subscribe(&self, topic: &str) -> mpsc::Receiver<Vec<u8>> {
        let (tx, rx) = mpsc::channel(MEMORY_SUBSCRIBER_CAPACITY);
        self.topics
            .lock()
            .await
            .entry(topic.to_string())
            .or_default()
            .push(tx);
        rx
    }
}

/// [`RelayTransport`] over a shared [`MemoryBus`].
pub struct MemoryTransport {
    bus: Arc<MemoryBus>,
}

impl MemoryTransport {
    pub fn new(bus: Arc<MemoryBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl RelayTransport for MemoryTransport {
    async fn connect(&self) -> Result<(), RelayError> {
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), RelayError> {
        self.bus.publish(topic, payload).await;
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<mpsc::Receiver<Vec<u8>>, RelayError> {
        Ok(self.bus.subscribe(topic).await)
    }

    async fn close(&self) -> Result<(), RelayError> {
        Ok(())
    }
}
