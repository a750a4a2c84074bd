//! # hubcast
//!
//! **Hubcast** is the real-time messaging core of a WebSocket pub/sub
//! plugin: a hub that owns live client connections, routes incoming frames
//! to channel handlers, fans messages out to channel subscribers, and
//! optionally mirrors broadcasts across peer server instances through a
//! relay.
//!
//! ## Features
//!
//! | Area          | Description                                                        | Key types / traits                  |
//! |---------------|--------------------------------------------------------------------|-------------------------------------|
//! | **Hub**       | Single-owner event loop over clients, channels, and handlers.      | [`Hub`], [`HubHandle`]              |
//! | **Clients**   | Per-connection read/write pumps over a bounded outbound buffer.    | [`Client`], [`Conn`]                |
//! | **Messages**  | JSON wire model and per-channel handlers.                          | [`Message`], [`MessageHandler`]     |
//! | **Relay**     | Cross-instance broadcast with self-echo suppression.               | [`Relay`], [`BusRelay`]             |
//! | **Service**   | Facade for embedders: publish, subscribe, direct send, snapshots.  | [`Service`]                         |
//! | **Errors**    | Typed errors; none are fatal to the hub loop.                      | [`ConnError`], [`ServiceError`]     |
//!
//! Delivery is best-effort by design: a slow consumer's full outbound
//! buffer drops messages for that consumer only, and nothing ever blocks
//! the event loop.
//!
//! ```no_run
//! use hubcast::{Hub, HubConfig, Service};
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let hub = Hub::new(HubConfig::default());
//!     let loop_hub = hub.clone();
//!     tokio::spawn(async move { loop_hub.run().await });
//!
//!     let service = Service::new(hub.clone());
//!     service
//!         .publish("updates", json!({"state": "ready"}))
//!         .await;
//!
//!     hub.stop();
//! }
//! ```
//!
//! ---

mod admin;
mod client;
mod config;
mod conn;
mod error;
mod hub;
pub mod messages;
mod relay;
mod service;

// ---- Public re-exports ----

pub use admin::{ChannelEntry, ChannelList, ClientList, PublishReceipt};
pub use client::Client;
pub use config::{HubConfig, RelayConfig};
pub use conn::Conn;
pub use error::{ConnError, RelayError, ServiceError};
pub use hub::{Hub, HubHandle};
pub use messages::{handler, ClientInfo, Message, MessageHandler};
pub use relay::{
    BroadcastTarget, BusRelay, Envelope, MemoryBus, MemoryTransport, Relay, RelayTransport,
};
pub use service::Service;
