//! Administrative operations exposed to the hosting application.
//!
//! These back the host's RPC tool surface (list clients, list channels,
//! publish); they add no behavior beyond the service facade, only typed
//! serializable results.

use serde::Serialize;
use serde_json::Value;

use crate::error::ServiceError;
use crate::messages::ClientInfo;
use crate::service::Service;

/// Result of `list_clients`.
#[derive(Debug, Serialize)]
pub struct ClientList {
    pub clients: Vec<ClientInfo>,
    pub count: usize,
}

/// One row of `list_channels`.
#[derive(Debug, Serialize)]
pub struct ChannelEntry {
    pub channel: String,
    pub subscribers: usize,
}

/// Result of `list_channels`.
#[derive(Debug, Serialize)]
pub struct ChannelList {
    pub channels: Vec<ChannelEntry>,
    pub count: usize,
}

/// Result of `publish_message`.
#[derive(Debug, Serialize)]
pub struct PublishReceipt {
    pub published: bool,
    pub channel: String,
}

impl Service {
    /// Snapshots every connected client.
    pub async fn list_clients(&self) -> ClientList {
        let ids = self.connected_clients().await;
        let mut clients = Vec::with_capacity(ids.len());
        for id in ids {
            if let Ok(info) = self.client_info(&id).await {
                clients.push(info);
            }
        }
        let count = clients.len();
        ClientList { clients, count }
    }

    /// Lists active channels with subscriber counts, sorted by channel name
    /// for deterministic output.
    pub async fn list_channels(&self) -> ChannelList {
        let mut channels: Vec<ChannelEntry> = self
            .channels()
            .await
            .into_iter()
            .map(|(channel, subscribers)| ChannelEntry {
                channel,
                subscribers,
            })
            .collect();
        channels.sort_by(|a, b| a.channel.cmp(&b.channel));
        let count = channels.len();
        ChannelList { channels, count }
    }

    /// Publishes on behalf of the host; rejects an empty channel name.
    pub async fn publish_message(
        &self,
        channel: &str,
        data: Value,
    ) -> Result<PublishReceipt, ServiceError> {
        if channel.is_empty() {
            return Err(ServiceError::EmptyChannel);
        }
        self.publish(channel, data).await;
        Ok(PublishReceipt {
            published: true,
            channel: channel.to_string(),
        })
    }
}
