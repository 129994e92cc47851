//! Test doubles for the transport port.
//!
//! [`RecordingTransport`] never delivers anything by itself: tests push the
//! events they want through [`RecordingTransport::emit`] (or straight into
//! `ConnectionOrchestrator::handle_event`) and inspect what the session did
//! through [`RecordingTransport::log`]. Enable with the `test-utils` feature.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{ChannelId, PeerIdentifier, TransportError};

use crate::domain::TransportEvent;
use crate::ports::{DataChannel, SignalingTransport, TransportEventSender, TransportHandle};

/// Everything the session asked of the transport.
#[derive(Debug, Clone, Default)]
pub struct TransportLog {
    /// Identifiers passed to `initialize`.
    pub initialized: Vec<PeerIdentifier>,
    /// Channels opened, in order.
    pub opened: Vec<(PeerIdentifier, ChannelId)>,
    /// Texts sent, in order.
    pub sent: Vec<(ChannelId, String)>,
    /// Channels closed, in order.
    pub closed: Vec<ChannelId>,
    /// Handles destroyed, in order.
    pub destroyed: Vec<PeerIdentifier>,
}

#[derive(Debug, Default)]
struct Script {
    log: TransportLog,
    events: Option<TransportEventSender>,
    request_counts: HashMap<PeerIdentifier, usize>,
    refuse_initialize: Option<TransportError>,
    fail_open: Option<TransportError>,
    fail_send: Option<TransportError>,
}

/// A scriptable transport that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    script: Arc<Mutex<Script>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle registered under `identifier`, sharing this transport's log.
    pub fn handle(&self, identifier: &str) -> Box<dyn TransportHandle> {
        Box::new(RecordingHandle {
            script: Arc::clone(&self.script),
            identifier: PeerIdentifier::new(identifier),
        })
    }

    /// Push `event` onto the queue captured by the last `initialize`.
    ///
    /// Returns `false` if nothing was initialized or the queue is closed.
    pub fn emit(&self, event: TransportEvent) -> bool {
        let script = self.script.lock();
        script
            .events
            .as_ref()
            .is_some_and(|events| events.send(event).is_ok())
    }

    /// Make `request_count(remote)` report `count`.
    ///
    /// Opening a channel to `remote` still adds one.
    pub fn set_request_count(&self, remote: &str, count: usize) {
        self.script
            .lock()
            .request_counts
            .insert(PeerIdentifier::new(remote), count);
    }

    /// Fail the next `initialize` synchronously.
    pub fn refuse_initialize(&self, error: TransportError) {
        self.script.lock().refuse_initialize = Some(error);
    }

    /// Fail the next `open_channel`.
    pub fn fail_next_open(&self, error: TransportError) {
        self.script.lock().fail_open = Some(error);
    }

    /// Fail every `send` from now on.
    pub fn fail_sends(&self, error: TransportError) {
        self.script.lock().fail_send = Some(error);
    }

    /// Copy of the call log.
    pub fn log(&self) -> TransportLog {
        self.script.lock().log.clone()
    }
}

impl SignalingTransport for RecordingTransport {
    fn initialize(
        &self,
        identifier: PeerIdentifier,
        events: TransportEventSender,
    ) -> Result<(), TransportError> {
        let mut script = self.script.lock();
        if let Some(error) = script.refuse_initialize.take() {
            return Err(error);
        }
        script.log.initialized.push(identifier);
        script.events = Some(events);
        Ok(())
    }
}

#[derive(Debug)]
struct RecordingHandle {
    script: Arc<Mutex<Script>>,
    identifier: PeerIdentifier,
}

impl TransportHandle for RecordingHandle {
    fn identifier(&self) -> &PeerIdentifier {
        &self.identifier
    }

    fn open_channel(&self, remote: &PeerIdentifier) -> Result<Box<dyn DataChannel>, TransportError> {
        let mut script = self.script.lock();
        if let Some(error) = script.fail_open.take() {
            return Err(error);
        }
        let id = ChannelId::random();
        script.log.opened.push((remote.clone(), id));
        *script.request_counts.entry(remote.clone()).or_default() += 1;
        Ok(Box::new(RecordingChannel {
            script: Arc::clone(&self.script),
            id,
            remote: remote.clone(),
        }))
    }

    fn request_count(&self, remote: &PeerIdentifier) -> usize {
        self.script
            .lock()
            .request_counts
            .get(remote)
            .copied()
            .unwrap_or(0)
    }

    fn destroy(&self) {
        self.script.lock().log.destroyed.push(self.identifier.clone());
    }
}

#[derive(Debug)]
struct RecordingChannel {
    script: Arc<Mutex<Script>>,
    id: ChannelId,
    remote: PeerIdentifier,
}

impl DataChannel for RecordingChannel {
    fn id(&self) -> ChannelId {
        self.id
    }

    fn remote(&self) -> &PeerIdentifier {
        &self.remote
    }

    fn send(&self, text: &str) -> Result<(), TransportError> {
        let mut script = self.script.lock();
        if let Some(error) = script.fail_send.clone() {
            return Err(error);
        }
        script.log.sent.push((self.id, text.to_string()));
        Ok(())
    }

    fn close(&self) {
        self.script.lock().log.closed.push(self.id);
    }
}
