//! # Domain Layer
//!
//! The session state machine's data: the session record itself, the typed
//! transport events it reacts to, its configuration and its errors.

pub mod config;
pub mod errors;
pub mod events;
pub mod session;

pub use config::ConnectionConfig;
pub use errors::{ConnectionError, PreconditionError};
pub use events::TransportEvent;
pub use session::{Session, StartupPhase};
