//! # Adapters
//!
//! - `StaticConfigProvider` - In-code configuration
//! - `TomlConfigProvider` - Config file loading (requires "toml-config" feature)
//! - `MemorySignalingHub` / `MemoryTransport` - In-process signaling service
//!   (requires "memory" feature)

/// Configuration providers
pub mod config;

/// In-process transport
#[cfg(feature = "memory")]
pub mod memory;

pub use config::StaticConfigProvider;

#[cfg(feature = "toml-config")]
pub use config::{ConfigError, TomlConfigProvider};

#[cfg(feature = "memory")]
pub use memory::{MemoryChannel, MemorySignalingHub, MemoryTransport, MemoryTransportHandle};
