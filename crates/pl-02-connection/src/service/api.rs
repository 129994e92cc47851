use pl_01_identity::CodeCandidate;
use shared_bus::SessionEvent;
use shared_types::{ChannelId, SessionSnapshot};
use tracing::{debug, info, warn};

use super::core::ConnectionOrchestrator;
use crate::domain::{ConnectionError, PreconditionError, StartupPhase};
use crate::ports::ConnectionApi;

impl ConnectionApi for ConnectionOrchestrator {
    fn connect<C: Into<CodeCandidate>>(&mut self, code: C) -> Result<ChannelId, ConnectionError> {
        let candidate = code.into();

        let Some(handle) = self.session.handle() else {
            warn!(target_code = %candidate, "Connect rejected: transport not ready");
            return Err(PreconditionError::TransportNotReady.into());
        };

        let target = candidate.normalize().map_err(|reason| {
            warn!(target_code = %candidate, %reason, "Connect rejected: invalid code");
            PreconditionError::InvalidCode {
                input: candidate.to_string(),
                reason,
            }
        })?;

        if let Some(current) = self.session.connected_to() {
            warn!(%current, "Connect rejected: connection already exists");
            return Err(PreconditionError::ConnectionExists {
                remote: current.clone(),
            }
            .into());
        }

        let remote = self.namespace.derive(Some(target));
        let channel = handle.open_channel(&remote)?;
        let id = channel.id();
        info!(%remote, channel = %id, "Opened outbound channel");

        self.session.adopt_channel(channel);
        self.outbox.push(SessionEvent::ChannelOpened {
            session: self.session.own_code(),
            remote,
            channel: id,
            reciprocated: false,
        });
        self.record_status();
        Ok(id)
    }

    fn disconnect(&mut self) {
        let phase = self.session.startup();
        if let Some(channel) = self.session.release() {
            info!(remote = %channel.remote(), "Closed channel on disconnect");
            self.outbox.push(SessionEvent::ChannelClosed {
                session: self.session.own_code(),
                remote: channel.remote().clone(),
                channel: channel.id(),
            });
        }
        // A disconnect before startup leaves nothing to tear down.
        if phase != StartupPhase::NotStarted {
            self.session.set_startup(StartupPhase::TornDown);
        }
        debug!(?phase, "Session disconnected");
        self.record_status();
    }

    fn send_message(&self, text: &str) -> Result<(), ConnectionError> {
        let channel = self
            .session
            .channel()
            .ok_or(PreconditionError::NoActiveConnection)?;
        channel.send(text)?;
        debug!(remote = %channel.remote(), len = text.len(), "Sent message");
        Ok(())
    }

    fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }
}
