//! Shared test doubles and helpers.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use hubcast::{Client, Conn, ConnError, Hub, HubConfig, Message};

/// In-memory [`Conn`]: records writes, serves reads from a queue, and fails
/// blocked reads once closed.
pub struct MockConn {
    written: Mutex<Vec<Message>>,
    read_tx: mpsc::Sender<Message>,
    read_rx: tokio::sync::Mutex<mpsc::Receiver<Message>>,
    closed: CancellationToken,
}

impl MockConn {
    pub fn new() -> Self {
        let (read_tx, read_rx) = mpsc::channel(16);
        Self {
            written: Mutex::new(Vec::new()),
            read_tx,
            read_rx: tokio::sync::Mutex::new(read_rx),
            closed: CancellationToken::new(),
        }
    }

    /// Queues a frame for the read pump to pick up.
    pub async fn push_read(&self, msg: Message) {
        let _ = self.read_tx.send(msg).await;
    }

    /// Frames written so far.
    pub fn written(&self) -> Vec<Message> {
        self.written.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}

#[async_trait]
impl Conn for MockConn {
    async fn read_json(&self) -> Result<Message, ConnError> {
        let mut rx = self.read_rx.lock().await;
        tokio::select! {
            _ = self.closed.cancelled() => Err(ConnError::Closed),
            next = rx.recv() => next.ok_or(ConnError::Closed),
        }
    }

    async fn write_json(&self, msg: &Message) -> Result<(), ConnError> {
        if self.closed.is_cancelled() {
            return Err(ConnError::Closed);
        }
        self.written.lock().unwrap().push(msg.clone());
        Ok(())
    }

    async fn close(&self) -> Result<(), ConnError> {
        self.closed.cancel();
        Ok(())
    }
}

/// Creates a hub and spawns its event loop.
pub fn start_hub() -> Arc<Hub> {
    start_hub_with(HubConfig::default())
}

pub fn start_hub_with(cfg: HubConfig) -> Arc<Hub> {
    let hub = Hub::new(cfg);
    let loop_hub = hub.clone();
    tokio::spawn(async move { loop_hub.run().await });
    hub
}

/// Creates, registers, and starts (write pump only) a mock-backed client.
pub async fn register_client(hub: &Arc<Hub>, id: &str) -> (Arc<Client>, Arc<MockConn>) {
    let conn = Arc::new(MockConn::new());
    let client = Arc::new(Client::new(id, conn.clone(), hub.handle()));
    hub.register(client.clone());
    tokio::spawn(client.clone().write_pump());
    settle().await;
    (client, conn)
}

/// Lets queued hub work drain.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}
