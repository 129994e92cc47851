//! Errors returned by connection operations.

use shared_types::{CodeError, PeerIdentifier, TransportError};
use thiserror::Error;

/// A caller asked for something the session cannot do in its current state.
///
/// These are checked synchronously before anything reaches the transport,
/// so a precondition failure never changes session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// No transport handle yet (startup still pending, failed, or torn down).
    #[error("The transport is not initialized yet.")]
    TransportNotReady,

    /// The target code did not normalize into a valid code.
    #[error("Invalid code {input:?}: {reason}")]
    InvalidCode {
        /// What the caller passed, as text.
        input: String,
        /// Why it was rejected.
        reason: CodeError,
    },

    /// The session already holds an outbound channel.
    #[error("A connection already exists (to {remote}).")]
    ConnectionExists {
        /// Remote of the channel already held.
        remote: PeerIdentifier,
    },

    /// `send_message` without a held channel.
    #[error("There is no active connection.")]
    NoActiveConnection,
}

/// Errors from the connection orchestrator and the session driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// Rejected before reaching the transport.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// The transport refused or failed the operation.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The transport reported an impossible number of channel requests for
    /// one remote.
    #[error("transport reported {count} channel requests for {remote}")]
    InvariantViolation {
        /// Remote the requests were counted for.
        remote: PeerIdentifier,
        /// The count the transport reported.
        count: usize,
    },

    /// The session driver is no longer running.
    #[error("session is closed")]
    SessionClosed,
}

impl ConnectionError {
    /// Whether this error was raised by a precondition check.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}
