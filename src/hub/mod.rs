//! Coordination core: client registry, channel index, and the event loop.
//!
//! The [`Hub`] is the single owner of all mutable pub/sub state. Every
//! mutation is serialized: performed either inside the event loop task or
//! under the hub's one read-write lock, so snapshot queries never round-trip
//! through the loop.
//!
//! ## Files & responsibilities
//! - **core.rs**: state, queues, the event loop (`run`/`stop`),
//!   registration and removal, handler dispatch, [`HubHandle`].
//! - **pubsub.rs**: publish/local-cast ingress, subscribe/unsubscribe,
//!   direct sends, the non-blocking fan-out.
//! - **queries.rs**: handler/callback/relay registration and read-only
//!   snapshots.
//!
//! ## Wiring (module-level flow)
//! ```text
//! Client read pumps ──► incoming ──┐
//! Hub::register     ──► register  ──┤
//! Hub::unregister   ──► unregister ─┤
//! Hub::publish      ──► broadcast ──┼──► Hub::run() ── select! loop
//! Relay ingress     ──► local_cast ─┤         │
//! Hub::stop         ──► done token ─┘         │
//!                                             ├─ register    → clients map + on_connect callbacks
//!                                             ├─ unregister  → drop from maps, close, on_disconnect
//!                                             ├─ incoming    → handlers[channel] (errors logged)
//!                                             ├─ broadcast   → relay (if available) + local fan-out
//!                                             └─ local_cast  → local fan-out only (never the relay)
//!
//! fan-out: copy subscriber ids under the read lock, release, then
//! try_send into each client's bounded outbound buffer. A full buffer
//! drops the message for that client; the loop never blocks on a slow
//! consumer.
//! ```
//!
//! ## Rules
//! - `broadcast` and `local_cast` are **distinct queues**: a relay-originated
//!   message can never be re-published to the relay, which is what prevents
//!   reflection loops between instances.
//! - A channel key exists in the index iff its subscriber set is non-empty.
//! - Unregistering an unknown client is a no-op; removal closes the client.
//! - No failure terminates the loop; only `stop` does.

mod core;
mod pubsub;
mod queries;

pub use self::core::{Hub, HubHandle};
