use async_trait::async_trait;
use tracing::warn;

use crate::hub::Hub;
use crate::messages::Message;
use crate::relay::BroadcastTarget;

impl Hub {
    /// Enqueues `msg` for broadcast on `channel`: forwarded to the relay
    /// when one is attached and available, then fanned out to local
    /// subscribers. The message's own channel field is overwritten.
    pub async fn publish(&self, channel: &str, mut msg: Message) {
        msg.channel = channel.to_string();
        if self.broadcast_tx.send(msg).await.is_err() {
            warn!(channel = %channel, "hub stopped, dropping publish");
        }
    }

    /// Adds `client_id` to `channel`. Returns false iff the client is
    /// unknown, in which case nothing changes.
    pub async fn subscribe(&self, channel: &str, client_id: &str) -> bool {
        let mut state = self.state.write().await;
        let Some(client) = state.clients.get(client_id).cloned() else {
            return false;
        };
        state
            .channels
            .entry(channel.to_string())
            .or_default()
            .insert(client_id.to_string());
        client.add_channel(channel).await;
        true
    }

    /// Removes `client_id` from `channel`, deleting the channel key when its
    /// subscriber set empties. Returns false iff the channel has no
    /// subscriber set.
    pub async fn unsubscribe(&self, channel: &str, client_id: &str) -> bool {
        let mut state = self.state.write().await;
        let Some(subs) = state.channels.get_mut(channel) else {
            return false;
        };
        subs.remove(client_id);
        if subs.is_empty() {
            state.channels.remove(channel);
        }
        if let Some(client) = state.clients.get(client_id).cloned() {
            client.remove_channel(channel).await;
        }
        true
    }

    /// Non-blocking direct send into one client's outbound buffer.
    ///
    /// Returns false when the client is unknown or its buffer is full; no
    /// write happens in either case.
    pub async fn send_to_client(&self, client_id: &str, msg: Message) -> bool {
        let client = self.state.read().await.clients.get(client_id).cloned();
        match client {
            Some(client) => client.try_send(msg),
            None => false,
        }
    }

    /// Delivers one message to every current subscriber of its channel.
    ///
    /// Subscriber ids are copied out under the read lock first, so a slow
    /// consumer can never hold the lock; a full outbound buffer drops the
    /// message for that client only.
    pub(super) async fn fan_out(&self, msg: &Message) {
        let ids: Vec<String> = {
            let state = self.state.read().await;
            match state.channels.get(&msg.channel) {
                Some(subs) => subs.iter().cloned().collect(),
                None => return,
            }
        };

        for id in ids {
            let client = self.state.read().await.clients.get(&id).cloned();
            let Some(client) = client else { continue };
            if !client.try_send(msg.clone()) {
                warn!(client_id = %id, channel = %msg.channel, "outbound buffer full, dropping");
            }
        }
    }
}

#[async_trait]
impl BroadcastTarget for Hub {
    /// Relay ingress: fan out to local subscribers only, never back to the
    /// relay.
    async fn broadcast_to_local(&self, msg: Message) {
        if self.local_cast_tx.send(msg).await.is_err() {
            warn!("hub stopped, dropping relayed message");
        }
    }
}
