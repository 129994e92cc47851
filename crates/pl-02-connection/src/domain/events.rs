//! # Transport Events
//!
//! Everything the transport reports asynchronously is turned into one of
//! these values and pushed onto the session's event queue. A single
//! dispatcher consumes the queue, so handlers never run concurrently with
//! each other or with caller commands.

use shared_types::{ChannelId, PeerIdentifier, TransportError};

use crate::ports::TransportHandle;

/// One asynchronous notification from the transport.
#[derive(Debug)]
pub enum TransportEvent {
    /// Registration succeeded; the handle is now usable.
    Ready(Box<dyn TransportHandle>),

    /// A remote peer asked for a channel to us. Logged, nothing else.
    InboundRequest {
        /// Who is asking.
        remote: PeerIdentifier,
        /// The inbound channel.
        channel: ChannelId,
    },

    /// An inbound channel finished opening. Drives auto-reciprocation.
    InboundOpen {
        /// The peer at the other end.
        remote: PeerIdentifier,
        /// The inbound channel.
        channel: ChannelId,
    },

    /// An outbound channel we opened finished opening.
    OutboundOpen {
        /// The dialed peer.
        remote: PeerIdentifier,
        /// The outbound channel.
        channel: ChannelId,
    },

    /// Text arrived on any channel.
    Data {
        /// Sender.
        remote: PeerIdentifier,
        /// Channel it arrived on.
        channel: ChannelId,
        /// The text, unmodified.
        payload: String,
    },

    /// A channel (inbound or outbound) closed.
    Closed {
        /// The peer at the other end.
        remote: PeerIdentifier,
        /// The closed channel.
        channel: ChannelId,
    },

    /// The transport reported a failure.
    Failed(TransportError),
}

impl TransportEvent {
    /// Short name for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::InboundRequest { .. } => "inbound_request",
            Self::InboundOpen { .. } => "inbound_open",
            Self::OutboundOpen { .. } => "outbound_open",
            Self::Data { .. } => "data",
            Self::Closed { .. } => "closed",
            Self::Failed(_) => "failed",
        }
    }
}
