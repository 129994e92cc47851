//! # In-Process Signaling
//!
//! A signaling service and transport living entirely in one process. Every
//! session registered on the same [`MemorySignalingHub`] can reach every
//! other; notifications are pushed onto each session's event queue exactly
//! as a networked transport would.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{ChannelId, PeerIdentifier, TransportError};
use tokio::sync::mpsc::error::SendError;
use tracing::{debug, info};

use crate::domain::TransportEvent;
use crate::ports::{DataChannel, SignalingTransport, TransportEventSender, TransportHandle};

/// Shared registry of identifiers and open channels.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemorySignalingHub {
    state: Arc<Mutex<HubState>>,
}

#[derive(Debug, Default)]
struct HubState {
    peers: HashMap<PeerIdentifier, PeerEntry>,
    channels: HashMap<ChannelId, ChannelRecord>,
    next_registration: u64,
}

#[derive(Debug)]
struct PeerEntry {
    registration: u64,
    events: TransportEventSender,
}

#[derive(Debug)]
struct ChannelRecord {
    initiator: PeerIdentifier,
    acceptor: PeerIdentifier,
}

impl ChannelRecord {
    fn other_end(&self, from: &PeerIdentifier) -> Option<&PeerIdentifier> {
        if *from == self.initiator {
            Some(&self.acceptor)
        } else if *from == self.acceptor {
            Some(&self.initiator)
        } else {
            None
        }
    }

    fn links(&self, a: &PeerIdentifier, b: &PeerIdentifier) -> bool {
        (self.initiator == *a && self.acceptor == *b) || (self.initiator == *b && self.acceptor == *a)
    }
}

impl HubState {
    fn notify(&self, to: &PeerIdentifier, event: TransportEvent) {
        let Some(peer) = self.peers.get(to) else {
            return;
        };
        if peer.events.send(event).is_err() {
            debug!(peer = %to, "Event queue closed, dropping notification");
        }
    }

    fn is_current(&self, identifier: &PeerIdentifier, registration: u64) -> bool {
        self.peers
            .get(identifier)
            .is_some_and(|peer| peer.registration == registration)
    }

    /// Remove a peer and close every channel it is an end of.
    fn evict(&mut self, identifier: &PeerIdentifier) {
        if self.peers.remove(identifier).is_none() {
            return;
        }
        let orphaned: Vec<ChannelId> = self
            .channels
            .iter()
            .filter(|(_, record)| record.other_end(identifier).is_some())
            .map(|(id, _)| *id)
            .collect();
        for id in orphaned {
            if let Some(record) = self.channels.remove(&id) {
                if let Some(other) = record.other_end(identifier) {
                    self.notify(
                        other,
                        TransportEvent::Closed {
                            remote: identifier.clone(),
                            channel: id,
                        },
                    );
                }
            }
        }
        info!(peer = %identifier, "Peer unregistered");
    }
}

impl MemorySignalingHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport registering on this hub.
    #[must_use]
    pub fn transport(&self) -> MemoryTransport {
        MemoryTransport { hub: self.clone() }
    }

    #[must_use]
    pub fn is_registered(&self, identifier: &PeerIdentifier) -> bool {
        self.state.lock().peers.contains_key(identifier)
    }

    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.state.lock().peers.len()
    }

    /// Channels currently open, in either direction.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.state.lock().channels.len()
    }

    /// Simulate losing the signaling connection of `identifier`.
    ///
    /// The peer receives `Failed(Disconnected)`, then is unregistered and its
    /// channels closed.
    pub fn disconnect_peer(&self, identifier: &PeerIdentifier) {
        let mut state = self.state.lock();
        state.notify(identifier, TransportEvent::Failed(TransportError::Disconnected));
        state.evict(identifier);
    }

    fn register(
        &self,
        identifier: &PeerIdentifier,
        events: TransportEventSender,
    ) -> Result<u64, TransportError> {
        let mut state = self.state.lock();
        if state.peers.contains_key(identifier) {
            return Err(TransportError::IdentifierTaken(identifier.clone()));
        }
        state.next_registration += 1;
        let registration = state.next_registration;
        state.peers.insert(
            identifier.clone(),
            PeerEntry {
                registration,
                events,
            },
        );
        info!(peer = %identifier, "Peer registered");
        Ok(registration)
    }

    fn unregister(&self, identifier: &PeerIdentifier, registration: u64) {
        let mut state = self.state.lock();
        if state.is_current(identifier, registration) {
            state.evict(identifier);
        }
    }

    fn open(
        &self,
        local: &PeerIdentifier,
        registration: u64,
        remote: &PeerIdentifier,
    ) -> Result<ChannelId, TransportError> {
        let mut state = self.state.lock();
        if !state.is_current(local, registration) {
            return Err(TransportError::Disconnected);
        }

        let id = ChannelId::random();
        if !state.peers.contains_key(remote) {
            debug!(%local, %remote, "Dialed an unregistered peer");
            state.notify(local, TransportEvent::Failed(TransportError::PeerUnavailable(remote.clone())));
            state.notify(
                local,
                TransportEvent::Closed {
                    remote: remote.clone(),
                    channel: id,
                },
            );
            return Ok(id);
        }

        state.channels.insert(
            id,
            ChannelRecord {
                initiator: local.clone(),
                acceptor: remote.clone(),
            },
        );
        state.notify(
            remote,
            TransportEvent::InboundRequest {
                remote: local.clone(),
                channel: id,
            },
        );
        state.notify(
            remote,
            TransportEvent::InboundOpen {
                remote: local.clone(),
                channel: id,
            },
        );
        state.notify(
            local,
            TransportEvent::OutboundOpen {
                remote: remote.clone(),
                channel: id,
            },
        );
        Ok(id)
    }

    fn request_count(&self, local: &PeerIdentifier, remote: &PeerIdentifier) -> usize {
        self.state
            .lock()
            .channels
            .values()
            .filter(|record| record.links(local, remote))
            .count()
    }

    fn send(&self, id: ChannelId, from: &PeerIdentifier, text: &str) -> Result<(), TransportError> {
        let state = self.state.lock();
        let to = state
            .channels
            .get(&id)
            .and_then(|record| record.other_end(from))
            .ok_or(TransportError::ChannelClosed(id))?;
        state.notify(
            to,
            TransportEvent::Data {
                remote: from.clone(),
                channel: id,
                payload: text.to_string(),
            },
        );
        Ok(())
    }

    fn close(&self, id: ChannelId) {
        let mut state = self.state.lock();
        let Some(record) = state.channels.remove(&id) else {
            return;
        };
        debug!(channel = %id, "Channel closed");
        state.notify(
            &record.initiator,
            TransportEvent::Closed {
                remote: record.acceptor.clone(),
                channel: id,
            },
        );
        state.notify(
            &record.acceptor,
            TransportEvent::Closed {
                remote: record.initiator.clone(),
                channel: id,
            },
        );
    }
}

/// [`SignalingTransport`] backed by a [`MemorySignalingHub`].
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    hub: MemorySignalingHub,
}

impl MemoryTransport {
    #[must_use]
    pub fn new(hub: MemorySignalingHub) -> Self {
        Self { hub }
    }
}

impl SignalingTransport for MemoryTransport {
    fn initialize(
        &self,
        identifier: PeerIdentifier,
        events: TransportEventSender,
    ) -> Result<(), TransportError> {
        let event = match self.hub.register(&identifier, events.clone()) {
            Ok(registration) => TransportEvent::Ready(Box::new(MemoryTransportHandle {
                hub: self.hub.clone(),
                identifier,
                registration,
            })),
            Err(error) => TransportEvent::Failed(error),
        };
        if let Err(SendError(TransportEvent::Ready(handle))) = events.send(event) {
            // Nobody is listening for the handle.
            handle.destroy();
        }
        Ok(())
    }
}

/// A registration on a [`MemorySignalingHub`].
#[derive(Debug)]
pub struct MemoryTransportHandle {
    hub: MemorySignalingHub,
    identifier: PeerIdentifier,
    registration: u64,
}

impl TransportHandle for MemoryTransportHandle {
    fn identifier(&self) -> &PeerIdentifier {
        &self.identifier
    }

    fn open_channel(&self, remote: &PeerIdentifier) -> Result<Box<dyn DataChannel>, TransportError> {
        let id = self.hub.open(&self.identifier, self.registration, remote)?;
        Ok(Box::new(MemoryChannel {
            hub: self.hub.clone(),
            id,
            local: self.identifier.clone(),
            remote: remote.clone(),
        }))
    }

    fn request_count(&self, remote: &PeerIdentifier) -> usize {
        self.hub.request_count(&self.identifier, remote)
    }

    fn destroy(&self) {
        self.hub.unregister(&self.identifier, self.registration);
    }
}

/// One end of a channel on a [`MemorySignalingHub`].
#[derive(Debug)]
pub struct MemoryChannel {
    hub: MemorySignalingHub,
    id: ChannelId,
    local: PeerIdentifier,
    remote: PeerIdentifier,
}

impl DataChannel for MemoryChannel {
    fn id(&self) -> ChannelId {
        self.id
    }

    fn remote(&self) -> &PeerIdentifier {
        &self.remote
    }

    fn send(&self, text: &str) -> Result<(), TransportError> {
        self.hub.send(self.id, &self.local, text)
    }

    fn close(&self) {
        self.hub.close(self.id);
    }
}
