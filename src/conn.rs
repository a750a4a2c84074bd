//! # Frame-level connection capability.
//!
//! [`Conn`] is the seam between the hub core and whatever WebSocket library
//! the embedding application uses: the upgrade layer adapts a real socket to
//! this trait and hands it to a [`Client`](crate::Client).
//!
//! ## Contract
//! - Every method blocks until frame completion or error.
//! - `close` is idempotent.
//! - One task reading while another writes must be safe. Two concurrent
//!   readers or two concurrent writers are **not** required to be safe; the
//!   client's pump split guarantees the hub never does that.

use async_trait::async_trait;

use crate::error::ConnError;
use crate::messages::Message;

/// One frame-oriented JSON connection.
#[async_trait]
pub trait Conn: Send + Sync {
    /// Reads the next frame, blocking until one arrives or the connection
    /// fails.
    async fn read_json(&self) -> Result<Message, ConnError>;

    /// Writes one frame, blocking until it is handed to the transport.
    async fn write_json(&self, msg: &Message) -> Result<(), ConnError>;

    /// Closes the connection. Safe to call more than once and concurrently
    /// with in-flight reads or writes, which then fail with
    /// [`ConnError::Closed`].
    async fn close(&self) -> Result<(), ConnError>;
}
