//! # Event Publisher
//!
//! Defines the publishing side of the event bus.

use crate::events::{EventFilter, SessionEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

/// Where a session dispatcher sends what it observed.
///
/// Implementations must not block for long: the dispatcher awaits every
/// publish before handling its next command or transport event.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Deliver `event`, returning how many receivers got a copy.
    async fn publish(&self, event: SessionEvent) -> usize;
}

/// Broadcast bus shared by every session in the process.
///
/// A subscriber that falls more than `capacity` events behind skips ahead
/// rather than stalling the dispatchers.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every event published from now on that matches `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, sessions = ?filter.sessions, "New subscription");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Same as [`subscribe`](Self::subscribe), as a `Stream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: SessionEvent) -> usize {
        let topic = event.topic();
        let session = event.session();

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(?topic, %session, receivers, "Event published");
                receivers
            }
            // Nobody is listening yet; the event is dropped.
            Err(_) => {
                debug!(?topic, %session, "Event dropped (no subscribers)");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventTopic;
    use shared_types::{Code, SessionSnapshot};

    fn snapshot_event() -> SessionEvent {
        let code = Code::new(12_345).expect("valid test code");
        SessionEvent::StatusChanged {
            session: code,
            snapshot: SessionSnapshot::disconnected(code),
        }
    }

    #[tokio::test]
    async fn test_publish_no_subscribers() {
        let bus = InMemoryEventBus::new();
        assert_eq!(bus.publish(snapshot_event()).await, 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_gets_a_copy() {
        let bus = InMemoryEventBus::new();
        let _all = bus.subscribe(EventFilter::all());
        let _messages = bus.subscribe(EventFilter::topics(vec![EventTopic::Messages]));
        let _stream = bus.event_stream(EventFilter::all());

        // Filtering happens on the receiving side.
        assert_eq!(bus.publish(snapshot_event()).await, 3);
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_receiving() {
        let bus = InMemoryEventBus::new();
        {
            let _sub = bus.subscribe(EventFilter::all());
            assert_eq!(bus.publish(snapshot_event()).await, 1);
        }
        assert_eq!(bus.publish(snapshot_event()).await, 0);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let bus = InMemoryEventBus::with_capacity(0);
        let mut sub = bus.subscribe(EventFilter::all());
        bus.publish(snapshot_event()).await;
        assert!(sub.recv().await.is_some());
    }
}
