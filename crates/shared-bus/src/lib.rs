//! # Shared Bus - Session Event Bus
//!
//! Carries what a session's dispatcher observes (status changes, inbound
//! requests, received text, transport failures) to whoever renders it.
//!
//! ## Rules
//!
//! - Sessions **publish**; UI shells and the runtime **subscribe**.
//! - The bus never feeds back into a session. Commands travel through the
//!   session handle, not through the bus.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Session A   │                    │   UI shell   │
//! │  dispatcher  │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, SessionEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
    }
}
