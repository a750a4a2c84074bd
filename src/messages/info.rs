use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot view of one connected client.
///
/// Produced by `Client::info`; `channels` is an unordered list of the
/// client's current subscriptions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Unique client id assigned by the accepting layer.
    pub id: String,
    /// Connection instant, UTC.
    pub connected_at: DateTime<Utc>,
    /// Channels the client is subscribed to.
    pub channels: Vec<String>,
    /// Client-reported user agent, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}
