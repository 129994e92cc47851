//! Transport event handlers.

use shared_bus::SessionEvent;
use shared_types::{ChannelId, PeerIdentifier, TransportError};
use tracing::{debug, error, info, trace, warn};

use super::core::ConnectionOrchestrator;
use crate::domain::{ConnectionError, StartupPhase, TransportEvent};
use crate::ports::TransportHandle;

impl ConnectionOrchestrator {
    /// Apply one transport event to the session.
    ///
    /// # Errors
    ///
    /// - `InvariantViolation` when the transport reports more than two
    ///   channel requests for the remote of a freshly opened inbound channel
    /// - `Transport` when reciprocating fails
    ///
    /// The session stays consistent in both cases; the error is for the
    /// caller's log.
    pub fn handle_event(&mut self, event: TransportEvent) -> Result<(), ConnectionError> {
        trace!(kind = event.kind(), "Dispatching transport event");
        let result = match event {
            TransportEvent::Ready(handle) => {
                self.on_ready(handle);
                Ok(())
            }
            TransportEvent::InboundRequest { remote, channel } => {
                info!(%remote, %channel, "Inbound channel request");
                self.outbox.push(SessionEvent::InboundRequest {
                    session: self.session.own_code(),
                    remote,
                    channel,
                });
                Ok(())
            }
            TransportEvent::InboundOpen { remote, channel } => {
                self.on_inbound_open(remote, channel)
            }
            TransportEvent::OutboundOpen { remote, channel } => {
                debug!(%remote, %channel, "Outbound channel open");
                Ok(())
            }
            TransportEvent::Data {
                remote,
                channel,
                payload,
            } => {
                self.on_data(remote, channel, payload);
                Ok(())
            }
            TransportEvent::Closed { remote, channel } => {
                self.on_closed(remote, channel);
                Ok(())
            }
            TransportEvent::Failed(error) => {
                self.on_failed(error);
                Ok(())
            }
        };
        self.record_status();
        result
    }

    fn on_ready(&mut self, handle: Box<dyn TransportHandle>) {
        let phase = self.session.startup();
        if phase == StartupPhase::Pending && self.session.handle().is_none() {
            info!(identifier = %handle.identifier(), "Transport ready");
            self.session.adopt_handle(handle);
            self.session.set_startup(StartupPhase::Ready);
        } else {
            warn!(
                identifier = %handle.identifier(),
                ?phase,
                "Discarding unexpected transport handle"
            );
            handle.destroy();
        }
    }

    fn on_inbound_open(
        &mut self,
        remote: PeerIdentifier,
        channel: ChannelId,
    ) -> Result<(), ConnectionError> {
        let Some(handle) = self.session.handle() else {
            warn!(%remote, %channel, "Inbound channel without a transport handle");
            return Ok(());
        };

        match handle.request_count(&remote) {
            // Closed again before we got to it.
            0 => {
                debug!(%remote, %channel, "Inbound channel already gone");
                Ok(())
            }
            // Only the remote's request exists: answer it with our own channel.
            1 => {
                if let Some(current) = self.session.connected_to() {
                    warn!(%remote, %current, "Already connected elsewhere, not reciprocating");
                    return Ok(());
                }
                match handle.open_channel(&remote) {
                    Ok(outbound) => {
                        let id = outbound.id();
                        info!(%remote, channel = %id, "Reciprocated inbound channel");
                        self.session.adopt_channel(outbound);
                        self.outbox.push(SessionEvent::ChannelOpened {
                            session: self.session.own_code(),
                            remote,
                            channel: id,
                            reciprocated: true,
                        });
                        Ok(())
                    }
                    Err(error) => {
                        warn!(%remote, %error, "Failed to reciprocate inbound channel");
                        self.outbox.push(SessionEvent::TransportFailed {
                            session: self.session.own_code(),
                            error: error.clone(),
                        });
                        Err(error.into())
                    }
                }
            }
            // Ours and theirs: the pair is complete.
            2 => {
                debug!(%remote, "Return channel already exists");
                Ok(())
            }
            count => {
                error!(%remote, count, "Impossible channel request count");
                self.outbox.push(SessionEvent::InvariantViolated {
                    session: self.session.own_code(),
                    remote: remote.clone(),
                    count,
                });
                Err(ConnectionError::InvariantViolation { remote, count })
            }
        }
    }

    fn on_data(&mut self, remote: PeerIdentifier, channel: ChannelId, text: String) {
        info!(from = %remote, %channel, len = text.len(), "Received message");
        let from_code = self.namespace.code_of(&remote);
        self.outbox.push(SessionEvent::MessageReceived {
            session: self.session.own_code(),
            from: remote,
            from_code,
            channel,
            text,
        });
    }

    fn on_closed(&mut self, remote: PeerIdentifier, channel: ChannelId) {
        let held = self.session.channel().map(|held| held.id());
        if held != Some(channel) {
            debug!(%remote, %channel, "Channel closed");
            return;
        }
        self.session.take_channel();
        info!(%remote, %channel, "Held channel closed by remote");
        self.outbox.push(SessionEvent::ChannelClosed {
            session: self.session.own_code(),
            remote,
            channel,
        });
    }

    fn on_failed(&mut self, error: TransportError) {
        warn!(%error, "Transport failure");
        self.outbox.push(SessionEvent::TransportFailed {
            session: self.session.own_code(),
            error: error.clone(),
        });

        if let TransportError::PeerUnavailable(remote) = &error {
            if self.session.connected_to() == Some(remote) {
                if let Some(channel) = self.session.take_channel() {
                    channel.close();
                    self.outbox.push(SessionEvent::ChannelClosed {
                        session: self.session.own_code(),
                        remote: remote.clone(),
                        channel: channel.id(),
                    });
                }
            }
        }

        if !error.is_fatal() {
            return;
        }
        match self.session.startup() {
            StartupPhase::Pending => {
                info!("Startup failed, it may be retried");
                self.session.set_startup(StartupPhase::NotStarted);
            }
            StartupPhase::Ready => {
                if let Some(channel) = self.session.release() {
                    self.outbox.push(SessionEvent::ChannelClosed {
                        session: self.session.own_code(),
                        remote: channel.remote().clone(),
                        channel: channel.id(),
                    });
                }
                self.session.set_startup(StartupPhase::TornDown);
            }
            StartupPhase::NotStarted | StartupPhase::TornDown => {}
        }
    }
}
