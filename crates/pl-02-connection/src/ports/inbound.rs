//! # Driving Ports (Inbound API)

use pl_01_identity::CodeCandidate;
use shared_types::{ChannelId, SessionSnapshot};

use crate::domain::ConnectionError;

/// Operations a caller performs on a session.
///
/// Implemented by [`ConnectionOrchestrator`](crate::service::ConnectionOrchestrator).
/// Asynchronous callers go through [`SessionHandle`](crate::service::SessionHandle),
/// which forwards the same operations to the session's driver.
pub trait ConnectionApi {
    /// Open the one outbound channel to the peer registered under `code`.
    ///
    /// # Errors
    ///
    /// Checked in this order, all before the transport is touched:
    ///
    /// - `TransportNotReady` if no transport handle is held
    /// - `InvalidCode` if `code` does not normalize into a valid code
    /// - `ConnectionExists` if a channel is already held
    ///
    /// A transport refusal is returned as `ConnectionError::Transport`.
    ///
    /// # Returns
    ///
    /// The id of the newly held channel. Readiness is confirmed later by the
    /// transport's event queue.
    fn connect<C: Into<CodeCandidate>>(&mut self, code: C) -> Result<ChannelId, ConnectionError>;

    /// Close the channel, destroy the transport handle. Idempotent.
    fn disconnect(&mut self);

    /// Send `text` unmodified over the held channel.
    ///
    /// # Errors
    ///
    /// `NoActiveConnection` without a channel. Transport failures propagate.
    fn send_message(&self, text: &str) -> Result<(), ConnectionError>;

    /// Current derived snapshot. Pure.
    fn snapshot(&self) -> SessionSnapshot;
}
