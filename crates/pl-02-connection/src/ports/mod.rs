//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** what callers (UI shells, the runtime) use
//! - **Driven Ports (Outbound):** what the session needs from a transport
//!   and from configuration

pub mod inbound;
pub mod outbound;

pub use inbound::ConnectionApi;
pub use outbound::{
    ConfigProvider, DataChannel, SignalingTransport, TransportEventSender, TransportHandle,
};
