//! # Error types used by the hub, relay, and service facade.
//!
//! This module defines three error enums:
//!
//! - [`ConnError`] errors raised by the frame-level connection capability.
//! - [`RelayError`] errors raised by the cross-instance relay.
//! - [`ServiceError`] errors returned by the service facade.
//!
//! None of these are fatal to the hub event loop; the loop terminates only
//! through `Hub::stop`.

use thiserror::Error;

/// # Errors produced by a [`Conn`](crate::Conn) implementation.
///
/// A read or write error terminates the owning client's pump; the client is
/// then unregistered from the hub.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConnError {
    /// The connection is closed; no further frames will complete.
    #[error("connection closed")]
    Closed,

    /// Transport-level failure (socket error, interrupted frame, ...).
    #[error("transport error: {reason}")]
    Transport {
        /// Description from the underlying transport.
        reason: String,
    },

    /// A frame could not be encoded or decoded as JSON.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// # Errors produced by a [`Relay`](crate::Relay) implementation.
///
/// Relay failures are never fatal to the hub: a failed `start` leaves the hub
/// running standalone, and a failed `publish` is logged while the local
/// fan-out still proceeds.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RelayError {
    /// The relay has not been started, or has been stopped.
    #[error("relay unavailable")]
    Unavailable,

    /// The underlying bus transport failed.
    #[error("transport error: {reason}")]
    Transport {
        /// Description from the underlying transport.
        reason: String,
    },

    /// An envelope could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// # Errors returned by the [`Service`](crate::Service) facade.
///
/// These mirror the hub's `false` results as typed errors with no side
/// effects: the operation that failed did not mutate any state.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The client id is not registered with the hub.
    #[error("client '{id}' not found")]
    ClientNotFound {
        /// The unknown client id.
        id: String,
    },

    /// The channel has no subscriber set.
    #[error("channel '{channel}' not found")]
    ChannelNotFound {
        /// The unknown channel name.
        channel: String,
    },

    /// The client is unknown or its outbound buffer is full.
    #[error("client '{id}' not found or send buffer full")]
    ClientUnreachable {
        /// The target client id.
        id: String,
    },

    /// The channel name was empty.
    #[error("channel name must not be empty")]
    EmptyChannel,
}
