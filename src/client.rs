//! # Client: one live connection and its two pumps.
//!
//! A [`Client`] exclusively owns a [`Conn`] and runs two tasks against it:
//!
//! ```text
//! conn.read_json() ──► read_pump ──► hub incoming queue
//!                                      (stamps client_id + timestamp)
//!
//! hub fan-out ──► outbound queue ──► write_pump ──► conn.write_json()
//!                 (bounded, try_send,
//!                  drop on overflow)
//! ```
//!
//! ## Rules
//! - The write pump is the **only** writer to the connection; the read pump
//!   the only reader. `Conn` implementations never see two concurrent
//!   writers.
//! - Either pump exiting tears the client down: the read pump unregisters
//!   from the hub and closes the connection; the write pump closes the
//!   connection, which in turn fails the read pump's blocking read.
//! - `close` is idempotent and one-way. Pending outbound messages are
//!   discarded, not drained.
//! - The client holds only the sender halves of the hub's queues (a
//!   [`HubHandle`]), never the hub itself.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::conn::Conn;
use crate::hub::HubHandle;
use crate::messages::{ClientInfo, Message};

/// One connected peer: connection, subscriptions, and outbound buffer.
pub struct Client {
    id: String,
    conn: Arc<dyn Conn>,
    hub: HubHandle,
    subscriptions: RwLock<HashSet<String>>,
    outbound_tx: mpsc::Sender<Message>,
    outbound_rx: Mutex<Option<mpsc::Receiver<Message>>>,
    connected_at: DateTime<Utc>,
    user_agent: Option<String>,
    closed: AtomicBool,
    done: CancellationToken,
}

impl Client {
    /// Creates a client over `conn` wired to the hub behind `hub`.
    ///
    /// The outbound buffer capacity comes from the hub's configuration.
    pub fn new(id: impl Into<String>, conn: Arc<dyn Conn>, hub: HubHandle) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::channel(hub.outbound_capacity());
        Self {
            id: id.into(),
            conn,
            hub,
            subscriptions: RwLock::new(HashSet::new()),
            outbound_tx,
            outbound_rx: Mutex::new(Some(outbound_rx)),
            connected_at: Utc::now(),
            user_agent: None,
            closed: AtomicBool::new(false),
            done: CancellationToken::new(),
        }
    }

    /// Attaches the client-reported user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// The unique id assigned by the accepting layer.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Snapshot of this client's metadata. Safe from any context.
    pub async fn info(&self) -> ClientInfo {
        let channels = self.subscriptions.read().await.iter().cloned().collect();
        ClientInfo {
            id: self.id.clone(),
            connected_at: self.connected_at,
            channels,
            user_agent: self.user_agent.clone(),
        }
    }

    /// True once [`Client::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) async fn add_channel(&self, channel: &str) {
        self.subscriptions.write().await.insert(channel.to_string());
    }

    pub(crate) async fn remove_channel(&self, channel: &str) {
        self.subscriptions.write().await.remove(channel);
    }

    /// Non-blocking enqueue into the outbound buffer.
    ///
    /// Returns false when the buffer is full or the write pump has exited;
    /// the message is dropped for this client either way.
    pub(crate) fn try_send(&self, msg: Message) -> bool {
        self.outbound_tx.try_send(msg).is_ok()
    }

    /// Reads frames until the connection fails, stamping each with this
    /// client's id and an ingress timestamp before handing it to the hub.
    ///
    /// On exit the client is enqueued for unregistration and the connection
    /// is closed. Runs on its own task.
    pub async fn read_pump(self: Arc<Self>) {
        loop {
            match self.conn.read_json().await {
                Ok(mut msg) => {
                    msg.client_id = self.id.clone();
                    msg.timestamp = Utc::now();
                    if self.hub.submit_incoming(msg).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    debug!(client_id = %self.id, error = %err, "read pump exiting");
                    break;
                }
            }
        }
        self.hub.submit_unregister(Arc::clone(&self));
        let _ = self.conn.close().await;
    }

    /// Writes outbound messages until a write fails or the client closes,
    /// then closes the connection. Runs on its own task.
    ///
    /// A second invocation returns immediately: the buffer has exactly one
    /// consumer.
    pub async fn write_pump(self: Arc<Self>) {
        let mut rx = match self.outbound_rx.lock().await.take() {
            Some(rx) => rx,
            None => return,
        };
        loop {
            tokio::select! {
                _ = self.done.cancelled() => break,
                next = rx.recv() => match next {
                    Some(msg) => {
                        if let Err(err) = self.conn.write_json(&msg).await {
                            debug!(client_id = %self.id, error = %err, "write pump exiting");
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        let _ = self.conn.close().await;
    }

    /// Signals both pumps to stop. Idempotent; pending outbound messages
    /// are discarded when the write pump exits.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.done.cancel();
        }
    }
}
