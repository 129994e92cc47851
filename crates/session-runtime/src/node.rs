//! # Peer Node
//!
//! One session, spawned on the current tokio runtime and wired to a shared
//! signaling hub and event bus.

use std::sync::Arc;

use anyhow::{Context, Result};
use pl_02_connection::{ConnectionConfig, MemorySignalingHub, SessionDriver, SessionHandle};
use shared_bus::{EventFilter, EventStream, InMemoryEventBus, Subscription};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// A running session plus the means to stop it.
pub struct PeerNode {
    name: String,
    handle: SessionHandle,
    bus: Arc<InMemoryEventBus>,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PeerNode {
    /// Create a session on `hub` and spawn its driver.
    ///
    /// Registration starts immediately; wait on the handle for
    /// `Initialized` before connecting.
    pub fn spawn(
        name: impl Into<String>,
        hub: &MemorySignalingHub,
        bus: Arc<InMemoryEventBus>,
        config: &ConnectionConfig,
    ) -> Self {
        let name = name.into();
        let publisher = Arc::clone(&bus);
        let (driver, handle) = SessionDriver::new(config, Arc::new(hub.transport()), publisher);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(driver.run_with_shutdown(shutdown_rx));
        info!(peer = %name, code = %handle.own_code(), "Peer node spawned");

        Self {
            name,
            handle,
            bus,
            shutdown_tx,
            task,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The injected session context.
    #[must_use]
    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    /// Subscribe to this node's session events.
    ///
    /// `filter.sessions` is replaced with this node's code.
    #[must_use]
    pub fn subscribe(&self, mut filter: EventFilter) -> Subscription {
        filter.sessions = vec![self.handle.own_code()];
        self.bus.subscribe(filter)
    }

    /// Like [`subscribe`](Self::subscribe), as a `Stream`.
    #[must_use]
    pub fn events(&self, mut filter: EventFilter) -> EventStream {
        filter.sessions = vec![self.handle.own_code()];
        self.bus.event_stream(filter)
    }

    /// Signal the driver, wait for it to disconnect and exit.
    pub async fn shutdown(self) -> Result<()> {
        info!(peer = %self.name, "Shutting down peer node");
        // The driver may already have exited.
        let _ = self.shutdown_tx.send(true);
        self.task
            .await
            .with_context(|| format!("Session driver for {} panicked", self.name))
    }
}
