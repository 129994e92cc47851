use std::sync::Arc;

use pl_01_identity::IdentityNamespace;
use shared_bus::SessionEvent;
use shared_types::{Code, PeerIdentifier, SessionStatus};
use tracing::{debug, info, warn};

use crate::domain::{ConnectionError, Session, StartupPhase};
use crate::ports::{SignalingTransport, TransportEventSender};

/// Session orchestrator implementing the driving port.
///
/// # Example
///
/// ```rust,ignore
/// let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
/// let mut orchestrator = ConnectionOrchestrator::new(
///     own_code,
///     IdentityNamespace::default(),
///     transport,
///     events_tx,
/// );
/// orchestrator.start()?;
/// while let Some(event) = events_rx.recv().await {
///     orchestrator.handle_event(event)?;
/// }
/// ```
pub struct ConnectionOrchestrator {
    pub(crate) session: Session,
    pub(crate) namespace: IdentityNamespace,
    pub(crate) transport: Arc<dyn SignalingTransport>,
    /// Handed to the transport on startup; the transport pushes onto it.
    pub(crate) events: TransportEventSender,
    /// Bus events caused since the last `take_events`.
    pub(crate) outbox: Vec<SessionEvent>,
    last_status: SessionStatus,
}

impl ConnectionOrchestrator {
    /// Create an orchestrator for a fresh session.
    ///
    /// # Arguments
    ///
    /// * `own_code` - Code the session registers under
    /// * `namespace` - Prefix for registered and dialed identifiers
    /// * `transport` - Signaling collaborator
    /// * `events` - Queue the transport reports to
    pub fn new(
        own_code: Code,
        namespace: IdentityNamespace,
        transport: Arc<dyn SignalingTransport>,
        events: TransportEventSender,
    ) -> Self {
        let session = Session::new(own_code);
        let last_status = session.status();
        Self {
            session,
            namespace,
            transport,
            events,
            outbox: Vec::new(),
            last_status,
        }
    }

    /// Register the session's identifier with the transport, once.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if registration was requested
    /// - `Ok(false)` if startup already ran (pending, done or torn down)
    /// - `Err(Transport)` if the transport refused synchronously; startup
    ///   may then be retried
    pub fn start(&mut self) -> Result<bool, ConnectionError> {
        let phase = self.session.startup();
        if phase != StartupPhase::NotStarted {
            debug!(?phase, "Startup already ran, skipping");
            return Ok(false);
        }

        let identifier = self.own_identifier();
        self.session.set_startup(StartupPhase::Pending);
        info!(%identifier, "Registering with signaling service");

        if let Err(error) = self.transport.initialize(identifier, self.events.clone()) {
            warn!(%error, "Transport refused registration");
            self.session.set_startup(StartupPhase::NotStarted);
            self.outbox.push(SessionEvent::TransportFailed {
                session: self.session.own_code(),
                error: error.clone(),
            });
            return Err(error.into());
        }
        Ok(true)
    }

    /// The identifier this session registers under.
    #[must_use]
    pub fn own_identifier(&self) -> PeerIdentifier {
        self.namespace.derive(Some(self.session.own_code()))
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn namespace(&self) -> &IdentityNamespace {
        &self.namespace
    }

    /// Drain the bus events caused since the previous call.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Queue `StatusChanged` if the derived status moved.
    pub(crate) fn record_status(&mut self) {
        let status = self.session.status();
        if status == self.last_status {
            return;
        }
        debug!(from = %self.last_status, to = %status, "Session status changed");
        self.last_status = status;
        self.outbox.push(SessionEvent::StatusChanged {
            session: self.session.own_code(),
            snapshot: self.session.snapshot(),
        });
    }
}
