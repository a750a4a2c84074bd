//! # Service: the facade callers hold.
//!
//! A thin wrapper over the hub that stamps server-originated messages
//! (`event = "message"`, fresh timestamp), wraps non-object payloads as
//! `{"value": <data>}`, and turns the hub's `false` results into typed
//! [`ServiceError`]s.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ServiceError;
use crate::hub::Hub;
use crate::messages::{ClientInfo, Message, MessageHandler};

/// High-level pub/sub API backed by one [`Hub`].
#[derive(Clone)]
pub struct Service {
    hub: Arc<Hub>,
}

impl Service {
    /// Creates a service backed by `hub`.
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }

    /// The underlying hub.
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// Registers a message handler for a channel, replacing any existing
    /// one.
    pub async fn register_handler(&self, channel: &str, handler: MessageHandler) {
        self.hub.register_handler(channel, handler).await;
        debug!(channel = %channel, "handler registered");
    }

    /// Publishes `data` to all subscribers of `channel`.
    ///
    /// Non-object data is wrapped as `{"value": data}`.
    pub async fn publish(&self, channel: &str, data: Value) {
        let msg = Message::new(channel).with_data(wrap_data(data));
        self.hub.publish(channel, msg).await;
    }

    /// Adds a client to a channel.
    pub async fn subscribe(&self, channel: &str, client_id: &str) -> Result<(), ServiceError> {
        if !self.hub.subscribe(channel, client_id).await {
            return Err(ServiceError::ClientNotFound {
                id: client_id.to_string(),
            });
        }
        debug!(client_id = %client_id, channel = %channel, "subscribed");
        Ok(())
    }

    /// Removes a client from a channel.
    pub async fn unsubscribe(&self, channel: &str, client_id: &str) -> Result<(), ServiceError> {
        if !self.hub.unsubscribe(channel, client_id).await {
            return Err(ServiceError::ChannelNotFound {
                channel: channel.to_string(),
            });
        }
        debug!(client_id = %client_id, channel = %channel, "unsubscribed");
        Ok(())
    }

    /// Sends `data` directly to one client, bypassing channel fan-out.
    pub async fn send_to_client(
        &self,
        client_id: &str,
        channel: &str,
        data: Value,
    ) -> Result<(), ServiceError> {
        let msg = Message::new(channel).with_data(wrap_data(data));
        if !self.hub.send_to_client(client_id, msg).await {
            return Err(ServiceError::ClientUnreachable {
                id: client_id.to_string(),
            });
        }
        Ok(())
    }

    /// Appends a callback invoked with each newly connected client id.
    pub async fn on_connection(&self, cb: impl Fn(&str) + Send + Sync + 'static) {
        self.hub.on_connection(cb).await;
    }

    /// Appends a callback invoked with each disconnected client id.
    pub async fn on_disconnection(&self, cb: impl Fn(&str) + Send + Sync + 'static) {
        self.hub.on_disconnection(cb).await;
    }

    /// Ids of all connected clients.
    pub async fn connected_clients(&self) -> Vec<String> {
        self.hub.connected_clients().await
    }

    /// Snapshot of one client.
    pub async fn client_info(&self, client_id: &str) -> Result<ClientInfo, ServiceError> {
        self.hub
            .client_info(client_id)
            .await
            .ok_or_else(|| ServiceError::ClientNotFound {
                id: client_id.to_string(),
            })
    }

    /// Active channels with subscriber counts.
    pub async fn channels(&self) -> std::collections::HashMap<String, usize> {
        self.hub.channels().await
    }

    /// Number of connected clients.
    pub async fn client_count(&self) -> usize {
        self.hub.client_count().await
    }
}

/// Coerces arbitrary publish data to a payload object.
fn wrap_data(data: Value) -> Map<String, Value> {
    match data {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}
