//! # Shared Types Crate
//!
//! This crate contains the vocabulary every Peer-Link crate speaks: the
//! rendezvous `Code`, the transport-facing `PeerIdentifier`, channel ids and
//! the session status snapshot.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Valid by Construction**: A `Code` outside `10000..=99999` cannot exist.
//! - **Derived Status**: `SessionStatus` is computed from observable facts,
//!   never stored next to them.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
