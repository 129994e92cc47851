//! # Driven Ports (Outbound SPI)
//!
//! The transport/signaling collaborator and the configuration source. Any
//! implementation must report its asynchronous notifications as
//! [`TransportEvent`]s on the sender handed to
//! [`SignalingTransport::initialize`].

use std::fmt::Debug;

use shared_types::{ChannelId, PeerIdentifier, TransportError};
use tokio::sync::mpsc;

use crate::domain::{ConnectionConfig, TransportEvent};

/// Queue the transport pushes its notifications onto.
pub type TransportEventSender = mpsc::UnboundedSender<TransportEvent>;

/// Registers identifiers with a signaling service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one transport is typically shared
/// by every session in a process.
pub trait SignalingTransport: Send + Sync {
    /// Begin registering `identifier`.
    ///
    /// Completion is asynchronous: the transport later pushes
    /// `TransportEvent::Ready` with a usable handle, or `TransportEvent::Failed`
    /// (e.g. `IdentifierTaken`), onto `events`. Every later notification for
    /// this registration goes to the same sender.
    ///
    /// # Errors
    ///
    /// Only failures detectable synchronously (the signaling service cannot
    /// be reached at all, for instance).
    fn initialize(
        &self,
        identifier: PeerIdentifier,
        events: TransportEventSender,
    ) -> Result<(), TransportError>;
}

/// A live registration with the signaling service.
pub trait TransportHandle: Send + Debug {
    /// The identifier this handle is registered under.
    fn identifier(&self) -> &PeerIdentifier;

    /// Request an outbound channel to `remote`.
    ///
    /// The returned channel is usable for bookkeeping immediately; its
    /// readiness arrives later as `OutboundOpen`, or as `Failed` + `Closed`
    /// when `remote` is not registered.
    ///
    /// # Errors
    ///
    /// `Disconnected` once the handle has been destroyed.
    fn open_channel(&self, remote: &PeerIdentifier) -> Result<Box<dyn DataChannel>, TransportError>;

    /// Number of live channel requests (inbound and outbound) this handle
    /// associates with `remote`.
    fn request_count(&self, remote: &PeerIdentifier) -> usize;

    /// Unregister. Closes every channel the handle still has. Idempotent.
    fn destroy(&self);
}

/// One bidirectional text pipe to a remote peer.
pub trait DataChannel: Send + Debug {
    fn id(&self) -> ChannelId;

    fn remote(&self) -> &PeerIdentifier;

    /// Send `text` unmodified.
    ///
    /// # Errors
    ///
    /// `ChannelClosed` after either end closed the channel.
    fn send(&self, text: &str) -> Result<(), TransportError>;

    /// Close both ends. Idempotent.
    fn close(&self);
}

/// Configuration provider for session setup.
pub trait ConfigProvider: Send + Sync {
    /// Session configuration.
    fn get_connection_config(&self) -> ConnectionConfig;

    /// Log level requested by the configuration source, if any.
    fn get_log_level(&self) -> Option<String> {
        None
    }
}
