//! Wire data model: messages, client snapshots, handler and callback types.
//!
//! ## Contents
//! - [`Message`] the JSON frame exchanged with clients and relayed between
//!   instances
//! - [`ClientInfo`] snapshot view of one connected client
//! - [`MessageHandler`] per-channel ingress handler, plus the [`handler`]
//!   adapter for building one from an async closure
//! - [`ConnectionCallback`] connect/disconnect notification hook

mod info;
mod message;

pub use info::ClientInfo;
pub use message::Message;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Error type handlers may return; logged by the hub, never propagated.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by a [`MessageHandler`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>>;

/// Per-channel handler invoked by the hub for each incoming message.
///
/// Receives the originating client id and the message. Registering a handler
/// for a channel replaces any previous one.
pub type MessageHandler = Arc<dyn Fn(String, Message) -> HandlerFuture + Send + Sync>;

/// Callback invoked with a client id on connection or disconnection.
///
/// Callbacks are append-only and run on the hub's event loop task, outside
/// the registry lock. They must not block.
pub type ConnectionCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Adapts an async closure into a [`MessageHandler`].
///
/// # Example
/// ```
/// use hubcast::messages::{handler, Message};
///
/// let h = handler(|client_id: String, msg: Message| async move {
///     let _ = (client_id, msg.channel);
///     Ok(())
/// });
/// drop(h);
/// ```
pub fn handler<F, Fut>(f: F) -> MessageHandler
where
    F: Fn(String, Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    Arc::new(move |client_id, msg| -> HandlerFuture { Box::pin(f(client_id, msg)) })
}
