//! # Peer Connection Orchestration
//!
//! Turns two rendezvous codes into one bidirectional text conversation.
//! Each participant runs a session registered under `namespace + code`;
//! when one side opens a channel to the other, the receiving side opens a
//! channel back automatically, so both hold an outbound channel and both
//! can send.
//!
//! ## Architecture
//!
//! - **Domain Layer:** the session record, derived status, typed transport
//!   events, errors
//! - **Ports Layer:** `ConnectionApi` (inbound), `SignalingTransport` /
//!   `TransportHandle` / `DataChannel` / `ConfigProvider` (outbound)
//! - **Service Layer:** `ConnectionOrchestrator` (the state machine) and
//!   `SessionDriver` (its single dispatcher)
//! - **Adapters Layer:** in-process signaling hub and config providers
//!   (feature-gated)
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pl_02_connection::{ConnectionConfig, MemorySignalingHub, SessionDriver, SessionStatus};
//! use shared_bus::InMemoryEventBus;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), pl_02_connection::ConnectionError> {
//! let hub = MemorySignalingHub::new();
//! let bus = Arc::new(InMemoryEventBus::new());
//!
//! let (driver_a, a) = SessionDriver::new(&ConnectionConfig::default(), Arc::new(hub.transport()), bus.clone());
//! let (driver_b, b) = SessionDriver::new(&ConnectionConfig::default(), Arc::new(hub.transport()), bus);
//! tokio::spawn(driver_a.run());
//! tokio::spawn(driver_b.run());
//!
//! a.wait_for_status(SessionStatus::Initialized).await?;
//! b.wait_for_status(SessionStatus::Initialized).await?;
//!
//! a.connect(b.own_code()).await?;
//! b.wait_for_status(SessionStatus::Connected).await?;
//! b.send_message("hello").await?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Recording transport for deterministic tests.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use domain::{
    ConnectionConfig, ConnectionError, PreconditionError, Session, StartupPhase, TransportEvent,
};
pub use ports::{
    ConfigProvider, ConnectionApi, DataChannel, SignalingTransport, TransportEventSender,
    TransportHandle,
};
pub use service::{ConnectionOrchestrator, SessionDriver, SessionHandle};

pub use adapters::StaticConfigProvider;

#[cfg(feature = "memory")]
pub use adapters::{MemoryChannel, MemorySignalingHub, MemoryTransport, MemoryTransportHandle};

#[cfg(feature = "toml-config")]
pub use adapters::{ConfigError, TomlConfigProvider};

pub use pl_01_identity::CodeCandidate;
pub use shared_types::{ChannelId, Code, PeerIdentifier, SessionSnapshot, SessionStatus, TransportError};
