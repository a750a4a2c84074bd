//! # BusRelay: the default relay over a pluggable transport.
//!
//! ## Lifecycle
//! ```text
//! start(): transport.connect() → transport.subscribe(<prefix>broadcast)
//!          → available = true → spawn ingress task
//!
//! ingress: loop {
//!   payload ◄── bus subscription
//!   decode Envelope        — failure: log, skip
//!   instance_id == own?    — yes: discard (self-echo suppression)
//!   target.broadcast_to_local(message)
//! }
//!
//! stop():  available = false → cancel ingress → await its exit
//!          → transport.close()
//! ```
//!
//! Relays are single-use: reconnection after `stop` or a transport failure
//! is intentionally not implemented, and the hub checks `available()`
//! before every forward.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::messages::Message;
use crate::relay::{BroadcastTarget, Envelope, Relay, RelayTransport};

/// Default [`Relay`]: envelopes over a [`RelayTransport`], with a UUIDv4
/// instance id generated at construction.
pub struct BusRelay {
    transport: Arc<dyn RelayTransport>,
    target: Arc<dyn BroadcastTarget>,
    topic: String,
    instance_id: String,
    active: AtomicBool,
    done: CancellationToken,
    ingress: Mutex<Option<JoinHandle<()>>>,
}

impl BusRelay {
    /// Creates a relay publishing to `<cfg.prefix>broadcast` on `transport`
    /// and delivering peer messages to `target`.
    pub fn new(
        cfg: &RelayConfig,
        transport: Arc<dyn RelayTransport>,
        target: Arc<dyn BroadcastTarget>,
    ) -> Self {
        Self {
            transport,
            target,
            topic: format!("{}broadcast", cfg.prefix),
            instance_id: Uuid::new_v4().to_string(),
            active: AtomicBool::new(false),
            done: CancellationToken::new(),
            ingress: Mutex::new(None),
        }
    }

    /// This instance's envelope tag.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
}

#[async_trait]
impl Relay for BusRelay {
    async fn publish(&self, msg: &Message) -> Result<(), RelayError> {
        let envelope = Envelope {
            instance_id: self.instance_id.clone(),
            message: msg.clone(),
        };
        let payload = serde_json::to_vec(&envelope)?;
        self.transport.publish(&self.topic, payload).await
    }

    async fn start(&self) -> Result<(), RelayError> {
        self.transport.connect().await?;
        let rx = self.transport.subscribe(&self.topic).await?;
        self.active.store(true, Ordering::SeqCst);

        let task = tokio::spawn(ingress_loop(
            rx,
            self.instance_id.clone(),
            Arc::clone(&self.target),
            self.done.clone(),
        ));
        *self.ingress.lock().await = Some(task);

        info!(instance_id = %self.instance_id, topic = %self.topic, "relay started");
        Ok(())
    }

    async fn stop(&self) -> Result<(), RelayError> {
        self.active.store(false, Ordering::SeqCst);
        self.done.cancel();
        if let Some(task) = self.ingress.lock().await.take() {
            let _ = task.await;
        }
        self.transport.close().await
    }

    fn available(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Drains the bus subscription until cancellation or transport close.
async fn ingress_loop(
    mut rx: mpsc::Receiver<Vec<u8>>,
    instance_id: String,
    target: Arc<dyn BroadcastTarget>,
    done: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = done.cancelled() => return,
            next = rx.recv() => {
                let Some(payload) = next else { return };
                let envelope: Envelope = match serde_json::from_slice(&payload) {
                    Ok(envelope) => envelope,
                    Err(err) => {
                        error!(error = %err, "failed to decode relay envelope");
                        continue;
                    }
                };
                if envelope.instance_id == instance_id {
                    continue;
                }
                debug!(
                    from_instance = %envelope.instance_id,
                    channel = %envelope.message.channel,
                    "relaying message from bus"
                );
                target.broadcast_to_local(envelope.message).await;
            }
        }
    }
}
