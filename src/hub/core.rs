use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::client::Client;
use crate::config::HubConfig;
use crate::messages::{ConnectionCallback, Message, MessageHandler};
use crate::relay::Relay;

/// Everything the event loop and the lock-based operations mutate.
///
/// Invariants at every quiescent point:
/// - every id in a channel's subscriber set is a key of `clients`;
/// - a channel key is present iff its subscriber set is non-empty;
/// - each client's subscription set mirrors the inverted index.
pub(super) struct HubState {
    pub(super) clients: HashMap<String, Arc<Client>>,
    pub(super) channels: HashMap<String, HashSet<String>>,
    pub(super) handlers: HashMap<String, MessageHandler>,
    pub(super) on_connect: Vec<ConnectionCallback>,
    pub(super) on_disconnect: Vec<ConnectionCallback>,
    pub(super) relay: Option<Arc<dyn Relay>>,
}

struct HubReceivers {
    register: mpsc::UnboundedReceiver<Arc<Client>>,
    unregister: mpsc::UnboundedReceiver<Arc<Client>>,
    incoming: mpsc::Receiver<Message>,
    broadcast: mpsc::Receiver<Message>,
    local_cast: mpsc::Receiver<Message>,
}

/// The coordination core. See the module docs for the wiring.
///
/// Create one per plugin instance with [`Hub::new`], spawn [`Hub::run`] on a
/// task, and terminate it with [`Hub::stop`].
pub struct Hub {
    pub(super) state: RwLock<HubState>,
    register_tx: mpsc::UnboundedSender<Arc<Client>>,
    unregister_tx: mpsc::UnboundedSender<Arc<Client>>,
    incoming_tx: mpsc::Sender<Message>,
    pub(super) broadcast_tx: mpsc::Sender<Message>,
    pub(super) local_cast_tx: mpsc::Sender<Message>,
    receivers: Mutex<Option<HubReceivers>>,
    outbound_capacity: usize,
    done: CancellationToken,
}

impl Hub {
    /// Creates a hub with the given queue sizing.
    pub fn new(cfg: HubConfig) -> Arc<Self> {
        let (register_tx, register_rx) = mpsc::unbounded_channel();
        let (unregister_tx, unregister_rx) = mpsc::unbounded_channel();
        let (incoming_tx, incoming_rx) = mpsc::channel(cfg.message_capacity);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(cfg.message_capacity);
        let (local_cast_tx, local_cast_rx) = mpsc::channel(cfg.message_capacity);

        Arc::new(Self {
            state: RwLock::new(HubState {
                clients: HashMap::new(),
                channels: HashMap::new(),
                handlers: HashMap::new(),
                on_connect: Vec::new(),
                on_disconnect: Vec::new(),
                relay: None,
            }),
            register_tx,
            unregister_tx,
            incoming_tx,
            broadcast_tx,
            local_cast_tx,
            receivers: Mutex::new(Some(HubReceivers {
                register: register_rx,
                unregister: unregister_rx,
                incoming: incoming_rx,
                broadcast: broadcast_rx,
                local_cast: local_cast_rx,
            })),
            outbound_capacity: cfg.outbound_capacity,
            done: CancellationToken::new(),
        })
    }

    /// Returns the submission handle clients hold: the sender halves of the
    /// `incoming` and `unregister` queues, plus the outbound buffer sizing.
    pub fn handle(&self) -> HubHandle {
        HubHandle {
            incoming: self.incoming_tx.clone(),
            unregister: self.unregister_tx.clone(),
            outbound_capacity: self.outbound_capacity,
        }
    }

    /// Enqueues a client for registration. Returns immediately.
    pub fn register(&self, client: Arc<Client>) {
        if self.register_tx.send(client).is_err() {
            warn!("hub stopped, dropping registration");
        }
    }

    /// Enqueues a client for removal. Returns immediately; unregistering a
    /// client twice is a no-op.
    pub fn unregister(&self, client: Arc<Client>) {
        if self.unregister_tx.send(client).is_err() {
            warn!("hub stopped, dropping unregistration");
        }
    }

    /// Runs the event loop until [`Hub::stop`].
    ///
    /// Call once, on a dedicated task; a second call returns immediately.
    /// Pending queue items are abandoned on stop, and connected clients are
    /// left for the embedding layer to close.
    pub async fn run(&self) {
        let mut rx = match self.receivers.lock().await.take() {
            Some(rx) => rx,
            None => {
                warn!("hub event loop already started");
                return;
            }
        };

        loop {
            tokio::select! {
                _ = self.done.cancelled() => return,
                Some(client) = rx.register.recv() => self.add_client(client).await,
                Some(client) = rx.unregister.recv() => self.remove_client(client).await,
                Some(msg) = rx.incoming.recv() => self.dispatch(msg).await,
                Some(msg) = rx.broadcast.recv() => {
                    if msg.channel.is_empty() {
                        warn!("dropping broadcast without channel");
                        continue;
                    }
                    self.forward_to_relay(&msg).await;
                    self.fan_out(&msg).await;
                }
                Some(msg) = rx.local_cast.recv() => {
                    if msg.channel.is_empty() {
                        warn!("dropping local cast without channel");
                        continue;
                    }
                    self.fan_out(&msg).await;
                }
                else => return,
            }
        }
    }

    /// Signals the event loop to terminate. Idempotent.
    pub fn stop(&self) {
        self.done.cancel();
    }

    async fn add_client(&self, client: Arc<Client>) {
        let id = client.id().to_string();
        let callbacks = {
            let mut state = self.state.write().await;
            state.clients.insert(id.clone(), client);
            state.on_connect.clone()
        };
        info!(client_id = %id, "client registered");
        for cb in &callbacks {
            cb(&id);
        }
    }

    async fn remove_client(&self, client: Arc<Client>) {
        let id = client.id().to_string();
        let callbacks = {
            let mut state = self.state.write().await;
            if state.clients.remove(&id).is_none() {
                return;
            }
            state.channels.retain(|_, subs| {
                subs.remove(&id);
                !subs.is_empty()
            });
            state.on_disconnect.clone()
        };
        client.close();
        info!(client_id = %id, "client unregistered");
        for cb in &callbacks {
            cb(&id);
        }
    }

    async fn dispatch(&self, msg: Message) {
        if msg.channel.is_empty() {
            warn!("dropping message without channel");
            return;
        }
        let handler = self.state.read().await.handlers.get(&msg.channel).cloned();
        let Some(handler) = handler else {
            debug!(channel = %msg.channel, "no handler");
            return;
        };
        let channel = msg.channel.clone();
        let client_id = msg.client_id.clone();
        if let Err(err) = handler(client_id, msg).await {
            error!(channel = %channel, error = %err, "handler error");
        }
    }

    async fn forward_to_relay(&self, msg: &Message) {
        let relay = self.state.read().await.relay.clone();
        let Some(relay) = relay else { return };
        if !relay.available() {
            return;
        }
        if let Err(err) = relay.publish(msg).await {
            error!(error = %err, "relay publish failed");
        }
    }
}

/// Sender halves of the hub's submission queues.
///
/// Held by each [`Client`] as its non-owning back-reference to the hub: the
/// read pump feeds `incoming` and delivers the client to `unregister` on
/// exit. Cheap to clone.
#[derive(Clone)]
pub struct HubHandle {
    incoming: mpsc::Sender<Message>,
    unregister: mpsc::UnboundedSender<Arc<Client>>,
    outbound_capacity: usize,
}

impl HubHandle {
    pub(crate) async fn submit_incoming(&self, msg: Message) -> Result<(), ()> {
        self.incoming.send(msg).await.map_err(|_| ())
    }

    pub(crate) fn submit_unregister(&self, client: Arc<Client>) {
        let _ = self.unregister.send(client);
    }

    pub(crate) fn outbound_capacity(&self) -> usize {
        self.outbound_capacity
    }
}
