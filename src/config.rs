//! # Hub and relay configuration.
//!
//! [`HubConfig`] sizes the hub's internal queues; [`RelayConfig`] carries the
//! connection settings a bus transport needs plus the shared topic prefix.
//!
//! Neither type reads the environment. The embedding application sources
//! these values and passes them in.
//!
//! # Example
//! ```
//! use hubcast::{HubConfig, RelayConfig};
//!
//! let mut cfg = HubConfig::default();
//! cfg.outbound_capacity = 64;
//!
//! let relay = RelayConfig::default();
//! assert_eq!(relay.prefix, "orchestra:ws:");
//! ```

/// Queue and buffer sizing for the hub.
///
/// Overflowing a per-client outbound buffer drops the message for that client
/// only; the hub's own queues apply backpressure to producers instead.
#[derive(Clone, Debug)]
pub struct HubConfig {
    /// Capacity of the `incoming`, `broadcast`, and `local_cast` queues.
    pub message_capacity: usize,
    /// Capacity of each client's outbound buffer.
    pub outbound_capacity: usize,
}

impl Default for HubConfig {
    /// Provides the default configuration:
    /// - `message_capacity = 256`
    /// - `outbound_capacity = 256`
    fn default() -> Self {
        Self {
            message_capacity: 256,
            outbound_capacity: 256,
        }
    }
}

/// Connection settings for a relay bus transport.
///
/// `addr`, `password`, and `db` are consumed by wire transports (Redis,
/// NATS, ...) supplied by the embedder; the in-process
/// [`MemoryTransport`](crate::MemoryTransport) ignores them. All peers
/// sharing a `prefix` share one broadcast namespace.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Bus address.
    pub addr: String,
    /// Bus credential (empty = none).
    pub password: String,
    /// Bus namespace index.
    pub db: u32,
    /// Topic prefix; the broadcast topic is `<prefix>broadcast`.
    pub prefix: String,
}

impl Default for RelayConfig {
    /// Provides the default configuration:
    /// - `addr = "localhost:6379"`
    /// - `password = ""` (none)
    /// - `db = 0`
    /// - `prefix = "orchestra:ws:"`
    fn default() -> Self {
        Self {
            addr: "localhost:6379".to_string(),
            password: String::new(),
            db: 0,
            prefix: "orchestra:ws:".to_string(),
        }
    }
}
