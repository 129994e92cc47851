//! # Integration Scenarios
//!
//! Every scenario runs real `SessionDriver`s (through `PeerNode`) on one
//! `MemorySignalingHub` and one event bus.

pub mod lifecycle;
pub mod rendezvous;

#[cfg(test)]
pub(crate) mod support {
    use std::sync::Arc;
    use std::time::Duration;

    use pl_02_connection::{ConnectionConfig, MemorySignalingHub};
    use session_runtime::PeerNode;
    use shared_bus::{InMemoryEventBus, SessionEvent, Subscription};
    use shared_types::{Code, SessionStatus};
    use tokio::time::timeout;

    pub const WAIT: Duration = Duration::from_secs(2);

    pub fn code(value: u32) -> Code {
        Code::new(value).expect("valid test code")
    }

    /// A hub and a bus shared by every peer of one scenario.
    pub struct Network {
        pub hub: MemorySignalingHub,
        pub bus: Arc<InMemoryEventBus>,
    }

    impl Network {
        pub fn new() -> Self {
            Self {
                hub: MemorySignalingHub::new(),
                bus: Arc::new(InMemoryEventBus::new()),
            }
        }

        pub fn spawn(&self, name: &str, own_code: u32) -> PeerNode {
            let config = ConnectionConfig::for_testing().with_fixed_code(code(own_code));
            PeerNode::spawn(name, &self.hub, Arc::clone(&self.bus), &config)
        }

        /// Spawn and wait until registered.
        pub async fn spawn_ready(&self, name: &str, own_code: u32) -> PeerNode {
            let node = self.spawn(name, own_code);
            wait_status(&node, SessionStatus::Initialized).await;
            node
        }
    }

    pub async fn wait_status(node: &PeerNode, status: SessionStatus) {
        timeout(WAIT, node.handle().wait_for_status(status))
            .await
            .unwrap_or_else(|_| panic!("{} never became {status}", node.name()))
            .expect("session running");
    }

    pub async fn next_event(subscription: &mut Subscription) -> SessionEvent {
        timeout(WAIT, subscription.recv())
            .await
            .expect("timed out waiting for event")
            .expect("bus open")
    }

    /// Text of the next message on `subscription`.
    pub async fn next_text(subscription: &mut Subscription) -> String {
        match next_event(subscription).await {
            SessionEvent::MessageReceived { text, .. } => text,
            other => panic!("expected a message, got {other:?}"),
        }
    }
}
