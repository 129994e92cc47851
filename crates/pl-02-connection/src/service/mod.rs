//! # Connection Service
//!
//! [`ConnectionOrchestrator`] owns one [`Session`](crate::domain::Session)
//! and implements the [`ConnectionApi`](crate::ports::ConnectionApi) port
//! plus the transport-event handlers. It is synchronous: every state change
//! happens inside one method call, and each call queues the bus events it
//! caused.
//!
//! [`SessionDriver`] is the single dispatcher that feeds it: it takes caller
//! commands and transport events off their queues one at a time, publishes
//! the queued bus events and keeps the watched snapshot current.

mod api;
mod core;
mod driver;
mod events;

pub use self::core::ConnectionOrchestrator;
pub use driver::{SessionDriver, SessionHandle};
