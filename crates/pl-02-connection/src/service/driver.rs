//! # Session Driver
//!
//! The single dispatcher for one session. Caller commands and transport
//! events are consumed one at a time, so the orchestrator never sees two
//! handlers interleave.

use std::sync::Arc;

use pl_01_identity::{generate_code, CodeCandidate};
use shared_bus::EventPublisher;
use shared_types::{ChannelId, Code, SessionSnapshot, SessionStatus};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use super::core::ConnectionOrchestrator;
use crate::domain::{ConnectionConfig, ConnectionError, TransportEvent};
use crate::ports::{ConnectionApi, SignalingTransport};

/// A caller request, answered through its oneshot.
#[derive(Debug)]
enum SessionCommand {
    Start {
        reply: oneshot::Sender<Result<bool, ConnectionError>>,
    },
    Connect {
        code: CodeCandidate,
        reply: oneshot::Sender<Result<ChannelId, ConnectionError>>,
    },
    Disconnect {
        reply: oneshot::Sender<()>,
    },
    SendMessage {
        text: String,
        reply: oneshot::Sender<Result<(), ConnectionError>>,
    },
}

/// Owns the orchestrator and runs its dispatch loop.
pub struct SessionDriver {
    orchestrator: ConnectionOrchestrator,
    commands: mpsc::Receiver<SessionCommand>,
    events: mpsc::UnboundedReceiver<TransportEvent>,
    publisher: Arc<dyn EventPublisher>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionDriver {
    /// Create a session and the handle callers use to reach it.
    ///
    /// The session registers under `config.fixed_code`, or under a freshly
    /// drawn code. Nothing touches the transport until [`run`](Self::run).
    pub fn new(
        config: &ConnectionConfig,
        transport: Arc<dyn SignalingTransport>,
        publisher: Arc<dyn EventPublisher>,
    ) -> (Self, SessionHandle) {
        let own_code = config.fixed_code.unwrap_or_else(generate_code);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let orchestrator = ConnectionOrchestrator::new(
            own_code,
            config.identity_namespace(),
            transport,
            events_tx,
        );

        let (commands_tx, commands_rx) = mpsc::channel(config.command_capacity.max(1));
        let (snapshots_tx, snapshots_rx) = watch::channel(orchestrator.snapshot());

        let driver = Self {
            orchestrator,
            commands: commands_rx,
            events: events_rx,
            publisher,
            snapshots: snapshots_tx,
        };
        let handle = SessionHandle {
            commands: commands_tx,
            snapshots: snapshots_rx,
            own_code,
        };
        (driver, handle)
    }

    #[must_use]
    pub fn own_code(&self) -> Code {
        self.orchestrator.session().own_code()
    }

    /// Run until every [`SessionHandle`] is dropped.
    pub async fn run(self) {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        self.run_with_shutdown(shutdown_rx).await;
    }

    /// Run until every handle is dropped or `shutdown` flips to `true`.
    ///
    /// Startup happens first. On exit the session is disconnected, so the
    /// transport handle never outlives the driver.
    pub async fn run_with_shutdown(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(code = %self.own_code(), "Session driver started");
        if let Err(error) = self.orchestrator.start() {
            warn!(%error, "Session startup failed");
        }
        self.flush().await;

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Shutdown signal received");
                        break;
                    }
                }
                Some(event) = self.events.recv() => {
                    if let Err(error) = self.orchestrator.handle_event(event) {
                        warn!(%error, "Transport event handler failed");
                    }
                }
                command = self.commands.recv() => match command {
                    Some(command) => self.execute(command).await,
                    None => {
                        info!("All session handles dropped");
                        break;
                    }
                },
            }
            self.flush().await;
        }

        self.orchestrator.disconnect();
        // A handle still queued here arrives torn down and is destroyed.
        self.events.close();
        while let Ok(event) = self.events.try_recv() {
            match event {
                TransportEvent::Ready(_) => {
                    if let Err(error) = self.orchestrator.handle_event(event) {
                        debug!(%error, "Late transport handle after disconnect");
                    }
                }
                other => debug!(kind = other.kind(), "Dropping transport event after disconnect"),
            }
        }
        self.flush().await;
        info!(code = %self.own_code(), "Session driver stopped");
    }

    /// Apply a command, publish what it caused, then reply.
    async fn execute(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Start { reply } => {
                let result = self.orchestrator.start();
                self.flush().await;
                let _ = reply.send(result);
            }
            SessionCommand::Connect { code, reply } => {
                let result = self.orchestrator.connect(code);
                self.flush().await;
                let _ = reply.send(result);
            }
            SessionCommand::Disconnect { reply } => {
                self.orchestrator.disconnect();
                self.flush().await;
                let _ = reply.send(());
            }
            SessionCommand::SendMessage { text, reply } => {
                let _ = reply.send(self.orchestrator.send_message(&text));
            }
        }
    }

    /// Publish queued bus events, then refresh the watched snapshot.
    async fn flush(&mut self) {
        for event in self.orchestrator.take_events() {
            let receivers = self.publisher.publish(event).await;
            debug!(receivers, "Published session event");
        }
        let snapshot = self.orchestrator.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

/// Cloneable handle to a running session.
///
/// Every call is forwarded to the driver and answered after the driver has
/// applied it. Once the driver has stopped, calls fail with `SessionClosed`.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
    own_code: Code,
}

impl SessionHandle {
    /// The session's own code, fixed for its lifetime.
    #[must_use]
    pub fn own_code(&self) -> Code {
        self.own_code
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        *self.snapshots.borrow()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.snapshot().status
    }

    /// A receiver notified on every snapshot change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until the session reaches `status`.
    ///
    /// # Errors
    ///
    /// `SessionClosed` if the driver stops first.
    pub async fn wait_for_status(
        &self,
        status: SessionStatus,
    ) -> Result<SessionSnapshot, ConnectionError> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(|snapshot| snapshot.status == status)
            .await
            .map_err(|_| ConnectionError::SessionClosed)?;
        Ok(*snapshot)
    }

    /// Retry startup after a fatal registration failure.
    ///
    /// `Ok(false)` when startup already ran.
    pub async fn start(&self) -> Result<bool, ConnectionError> {
        self.request(|reply| SessionCommand::Start { reply }).await?
    }

    /// See [`ConnectionApi::connect`].
    pub async fn connect(
        &self,
        code: impl Into<CodeCandidate>,
    ) -> Result<ChannelId, ConnectionError> {
        let code = code.into();
        self.request(|reply| SessionCommand::Connect { code, reply })
            .await?
    }

    /// See [`ConnectionApi::disconnect`]. A stopped session is already
    /// disconnected, so this never fails.
    pub async fn disconnect(&self) {
        if self
            .request(|reply| SessionCommand::Disconnect { reply })
            .await
            .is_err()
        {
            debug!("Disconnect on a stopped session");
        }
    }

    /// See [`ConnectionApi::send_message`].
    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), ConnectionError> {
        let text = text.into();
        self.request(|reply| SessionCommand::SendMessage { text, reply })
            .await?
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, ConnectionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| ConnectionError::SessionClosed)?;
        reply_rx.await.map_err(|_| ConnectionError::SessionClosed)
    }
}
