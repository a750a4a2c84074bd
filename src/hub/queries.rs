use std::collections::HashMap;
use std::sync::Arc;

use crate::hub::Hub;
use crate::messages::{ClientInfo, MessageHandler};
use crate::relay::Relay;

impl Hub {
    /// Registers the handler for `channel`, replacing any existing one.
    pub async fn register_handler(&self, channel: &str, handler: MessageHandler) {
        self.state
            .write()
            .await
            .handlers
            .insert(channel.to_string(), handler);
    }

    /// Appends a callback invoked with each newly registered client id.
    pub async fn on_connection(&self, cb: impl Fn(&str) + Send + Sync + 'static) {
        self.state.write().await.on_connect.push(Arc::new(cb));
    }

    /// Appends a callback invoked with each unregistered client id.
    pub async fn on_disconnection(&self, cb: impl Fn(&str) + Send + Sync + 'static) {
        self.state.write().await.on_disconnect.push(Arc::new(cb));
    }

    /// Attaches (or replaces) the cross-instance relay.
    pub async fn set_relay(&self, relay: Arc<dyn Relay>) {
        self.state.write().await.relay = Some(relay);
    }

    /// Ids of all connected clients.
    pub async fn connected_clients(&self) -> Vec<String> {
        self.state.read().await.clients.keys().cloned().collect()
    }

    /// Snapshot of one client, or `None` if unknown.
    pub async fn client_info(&self, client_id: &str) -> Option<ClientInfo> {
        let client = self.state.read().await.clients.get(client_id).cloned();
        match client {
            Some(client) => Some(client.info().await),
            None => None,
        }
    }

    /// Active channels with their subscriber counts.
    pub async fn channels(&self) -> HashMap<String, usize> {
        self.state
            .read()
            .await
            .channels
            .iter()
            .map(|(name, subs)| (name.clone(), subs.len()))
            .collect()
    }

    /// Number of connected clients.
    pub async fn client_count(&self) -> usize {
        self.state.read().await.clients.len()
    }
}
