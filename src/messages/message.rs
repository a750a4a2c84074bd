//! # The JSON frame exchanged across every boundary of the hub.
//!
//! One [`Message`] type serves WebSocket frames, local fan-out, and relay
//! envelopes. The serde shape is tolerant on ingress (unknown fields
//! ignored, missing `event` defaults to `"message"`, missing `timestamp`
//! defaults to now) and stable on egress (empty `data` and `client_id` are
//! omitted; `timestamp` is RFC3339).
//!
//! A message with an empty `channel` decodes fine but is rejected by the
//! hub, which drops and logs it.
//!
//! ## Example
//! ```
//! use hubcast::messages::Message;
//! use serde_json::json;
//!
//! let msg = Message::new("updates")
//!     .with_event("progress")
//!     .with_field("step", json!(3));
//!
//! assert_eq!(msg.channel, "updates");
//! assert_eq!(msg.event, "progress");
//! assert!(msg.client_id.is_empty());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A pub/sub frame.
///
/// `client_id` is empty for server-originated messages; the read pump stamps
/// it (together with a fresh `timestamp`) on every frame a client sends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Target channel. Never empty on a message the hub accepts.
    #[serde(default)]
    pub channel: String,
    /// Event name within the channel.
    #[serde(default = "default_event")]
    pub event: String,
    /// Payload object; may be empty.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    /// Originating client id; empty when server-originated.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    /// Creation instant, UTC.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn default_event() -> String {
    "message".to_string()
}

impl Message {
    /// Creates a server-originated message on `channel` with the default
    /// `"message"` event, empty data, and the current timestamp.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            event: default_event(),
            data: Map::new(),
            client_id: String::new(),
            timestamp: Utc::now(),
        }
    }

    /// Replaces the event name.
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    /// Replaces the payload object.
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Inserts one payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Stamps the originating client id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }
}
