//! # Error Types
//!
//! Defines error types shared across crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{ChannelId, PeerIdentifier};

/// Why a value could not be turned into a rendezvous code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// The text form is not a whole integer (empty, letters, trailing junk).
    #[error("not a numeric code: {0:?}")]
    NotNumeric(String),

    /// The value is an integer but outside the code range.
    #[error("code {0} is outside the range 10000..=99999")]
    OutOfRange(i64),
}

/// Failures reported by the transport/signaling collaborator.
///
/// Propagated to callers unchanged; nothing in Peer-Link retries them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TransportError {
    /// Another session already registered this identifier (code collision).
    #[error("identifier {0} is already registered")]
    IdentifierTaken(PeerIdentifier),

    /// No peer is registered under the dialed identifier.
    #[error("peer {0} is unavailable")]
    PeerUnavailable(PeerIdentifier),

    /// The channel was closed before or during the operation.
    #[error("channel {0} is closed")]
    ChannelClosed(ChannelId),

    /// The transport handle has been torn down.
    #[error("transport is disconnected")]
    Disconnected,

    /// Any other network or signaling failure.
    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    /// Whether the transport handle is unusable after this failure.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::IdentifierTaken(_) | Self::Disconnected)
    }
}
