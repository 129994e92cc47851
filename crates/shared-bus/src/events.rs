//! # Session Events
//!
//! Defines all event types that flow through the shared bus. The dispatcher
//! of every session publishes them; UI shells and the runtime consume them.

use serde::{Deserialize, Serialize};
use shared_types::{ChannelId, Code, PeerIdentifier, SessionSnapshot, TransportError};

/// All events that can be published to the event bus.
///
/// Every variant names the `session` (its own code) that produced it, so
/// several sessions can share one bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    // =========================================================================
    // LIFECYCLE
    // =========================================================================
    /// The derived snapshot changed (transport handle or channel changed).
    StatusChanged {
        /// Originating session.
        session: Code,
        /// The new snapshot.
        snapshot: SessionSnapshot,
    },

    /// A remote peer asked for a channel to this session.
    InboundRequest {
        /// Originating session.
        session: Code,
        /// Who is asking.
        remote: PeerIdentifier,
        /// The inbound channel request.
        channel: ChannelId,
    },

    /// This session now holds an outbound channel.
    ChannelOpened {
        /// Originating session.
        session: Code,
        /// Peer at the other end.
        remote: PeerIdentifier,
        /// The channel now held by the session.
        channel: ChannelId,
        /// `true` when opened automatically in answer to an inbound request.
        reciprocated: bool,
    },

    /// The channel held by this session went away.
    ChannelClosed {
        /// Originating session.
        session: Code,
        /// Peer at the other end.
        remote: PeerIdentifier,
        /// The channel that closed.
        channel: ChannelId,
    },

    // =========================================================================
    // MESSAGES
    // =========================================================================
    /// Text arrived from a remote peer.
    MessageReceived {
        /// Originating (receiving) session.
        session: Code,
        /// Sender identifier.
        from: PeerIdentifier,
        /// Sender code, when the identifier carries our namespace.
        from_code: Option<Code>,
        /// Channel the text arrived on.
        channel: ChannelId,
        /// The message text.
        text: String,
    },

    // =========================================================================
    // FAILURES
    // =========================================================================
    /// The transport reported a failure through its event queue.
    TransportFailed {
        /// Originating session.
        session: Code,
        /// The failure, unchanged.
        error: TransportError,
    },

    /// More channel requests than possible were seen for one remote.
    InvariantViolated {
        /// Originating session.
        session: Code,
        /// Remote the transport associated the requests with.
        remote: PeerIdentifier,
        /// Request count the transport reported.
        count: usize,
    },
}

impl SessionEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::StatusChanged { .. }
            | Self::InboundRequest { .. }
            | Self::ChannelOpened { .. }
            | Self::ChannelClosed { .. } => EventTopic::Lifecycle,
            Self::MessageReceived { .. } => EventTopic::Messages,
            Self::TransportFailed { .. } | Self::InvariantViolated { .. } => EventTopic::Failures,
        }
    }

    /// Get the originating session code.
    #[must_use]
    pub fn session(&self) -> Code {
        match self {
            Self::StatusChanged { session, .. }
            | Self::InboundRequest { session, .. }
            | Self::ChannelOpened { session, .. }
            | Self::ChannelClosed { session, .. }
            | Self::MessageReceived { session, .. }
            | Self::TransportFailed { session, .. }
            | Self::InvariantViolated { session, .. } => *session,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Status, channel and inbound request events.
    Lifecycle,
    /// Received text.
    Messages,
    /// Transport failures and invariant breaches.
    Failures,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Sessions to include. Empty means all sessions.
    pub sessions: Vec<Code>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            sessions: Vec::new(),
        }
    }

    /// Create a filter for events from specific sessions.
    #[must_use]
    pub fn from_sessions(sessions: Vec<Code>) -> Self {
        Self {
            topics: Vec::new(),
            sessions,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &SessionEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let session_match = self.sessions.is_empty() || self.sessions.contains(&event.session());

        topic_match && session_match
    }
}
