//! # Session Runtime Library
//!
//! Composition for Peer-Link processes. The main entry point is the
//! `devnet` binary (`main.rs`); the pieces live here so they can be tested.
//!
//! - `config` - `RuntimeConfig`: config file plus `PL_*` environment
//! - `logging` - tracing subscriber installation
//! - `node` - `PeerNode`: one session wired to a hub and a bus

pub mod config;
pub mod logging;
pub mod node;

pub use config::{RuntimeConfig, RuntimeConfigError};
pub use logging::init_logging;
pub use node::PeerNode;
