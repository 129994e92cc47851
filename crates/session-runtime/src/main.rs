//! # Peer-Link Devnet
//!
//! Runs two peers, A and B, on one in-process signaling hub:
//!
//! 1. Load configuration (file named by `PL_CONFIG`, then `PL_*` env)
//! 2. Install logging
//! 3. Spawn both sessions and wait until both are registered
//! 4. B connects to A's code; A reciprocates automatically
//! 5. One message each way
//! 6. Disconnect both and exit
//!
//! Ctrl+C at any point skips to step 6.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use pl_02_connection::MemorySignalingHub;
use session_runtime::{init_logging, PeerNode, RuntimeConfig};
use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, SessionEvent};
use shared_types::SessionStatus;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_stream::StreamExt;
use tracing::{info, warn};

/// Upper bound for each wait in the scenario.
const STEP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::load().context("Failed to load configuration")?;
    init_logging(&config)?;

    info!("===========================================");
    info!("  Peer-Link Devnet v{}", env!("CARGO_PKG_VERSION"));
    info!("  Namespace: {}", config.connection.namespace);
    info!("===========================================");

    let hub = MemorySignalingHub::new();
    let bus = Arc::new(InMemoryEventBus::with_capacity(
        config.connection.event_bus_capacity,
    ));
    let (code_a, code_b) = config.peer_codes();
    let a = PeerNode::spawn("A", &hub, Arc::clone(&bus), &config.session_config(code_a));
    let b = PeerNode::spawn("B", &hub, Arc::clone(&bus), &config.session_config(code_b));
    let loggers = [log_session_events(&a), log_session_events(&b)];

    let outcome = tokio::select! {
        result = run_scenario(&a, &b) => result,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Interrupted, shutting down"),
                Err(error) => warn!(%error, "Failed to listen for Ctrl+C"),
            }
            Ok(())
        }
    };

    a.shutdown().await?;
    b.shutdown().await?;
    for logger in loggers {
        logger.abort();
    }
    info!(peers = hub.peer_count(), "Devnet stopped");
    outcome
}

async fn run_scenario(a: &PeerNode, b: &PeerNode) -> Result<()> {
    let mut a_inbox = a.subscribe(EventFilter::topics(vec![EventTopic::Messages]));
    let mut b_inbox = b.subscribe(EventFilter::topics(vec![EventTopic::Messages]));

    for node in [a, b] {
        wait_for(node, SessionStatus::Initialized).await?;
    }
    info!(
        code_a = %a.handle().own_code(),
        code_b = %b.handle().own_code(),
        "Both peers registered"
    );

    b.handle()
        .connect(a.handle().own_code())
        .await
        .context("B failed to connect to A")?;
    for node in [a, b] {
        wait_for(node, SessionStatus::Connected).await?;
    }
    info!("Both peers connected");

    b.handle().send_message("Hello from B").await?;
    a.handle().send_message("Hello from A").await?;

    for (node, inbox) in [(a, &mut a_inbox), (b, &mut b_inbox)] {
        let event = timeout(STEP_TIMEOUT, inbox.recv())
            .await
            .with_context(|| format!("{} received nothing", node.name()))?;
        match event {
            Some(SessionEvent::MessageReceived { from, text, .. }) => {
                info!(peer = node.name(), %from, %text, "Message delivered");
            }
            Some(other) => bail!("{} got unexpected event {other:?}", node.name()),
            None => bail!("event bus closed"),
        }
    }

    for node in [a, b] {
        node.handle().disconnect().await;
    }
    info!("Scenario complete");
    Ok(())
}

/// Log every lifecycle and failure event of `node` until aborted.
fn log_session_events(node: &PeerNode) -> JoinHandle<()> {
    let name = node.name().to_string();
    let mut events = node.events(EventFilter::topics(vec![
        EventTopic::Lifecycle,
        EventTopic::Failures,
    ]));
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            match event {
                SessionEvent::StatusChanged { snapshot, .. } => {
                    info!(peer = %name, status = %snapshot.status, "Status changed");
                }
                SessionEvent::TransportFailed { error, .. } => {
                    warn!(peer = %name, %error, "Transport failure");
                }
                other => info!(peer = %name, event = ?other, "Session event"),
            }
        }
    })
}

async fn wait_for(node: &PeerNode, status: SessionStatus) -> Result<()> {
    timeout(STEP_TIMEOUT, node.handle().wait_for_status(status))
        .await
        .with_context(|| format!("Timed out waiting for {} to become {status}", node.name()))?
        .with_context(|| format!("Session {} stopped", node.name()))?;
    Ok(())
}
