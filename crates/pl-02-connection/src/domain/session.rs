//! # Session Record
//!
//! The three facts a session holds: its own code, the transport handle (once
//! registration succeeded) and at most one outbound channel. Status is never
//! stored; it is derived from the last two on every read.

use shared_types::{Code, PeerIdentifier, SessionSnapshot, SessionStatus};
use tracing::debug;

use crate::ports::{DataChannel, TransportHandle};

/// Where the one-time startup sequence stands.
///
/// Startup runs at most once per session. A fatal registration failure while
/// `Pending` resets to `NotStarted` so the owner may retry; an explicit
/// disconnect moves to `TornDown`, after which nothing restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupPhase {
    /// `initialize` not called yet.
    #[default]
    NotStarted,
    /// `initialize` called, waiting for `Ready` or a failure.
    Pending,
    /// The transport handle was adopted.
    Ready,
    /// Disconnected or fatally failed after startup; terminal.
    TornDown,
}

/// A single participant's view of its connection.
#[derive(Debug)]
pub struct Session {
    own_code: Code,
    handle: Option<Box<dyn TransportHandle>>,
    channel: Option<Box<dyn DataChannel>>,
    startup: StartupPhase,
}

impl Session {
    /// Create an idle session owning `own_code`.
    #[must_use]
    pub fn new(own_code: Code) -> Self {
        Self {
            own_code,
            handle: None,
            channel: None,
            startup: StartupPhase::NotStarted,
        }
    }

    /// The code this session registered (or will register) under.
    #[must_use]
    pub fn own_code(&self) -> Code {
        self.own_code
    }

    /// Derived status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        SessionStatus::derive(self.handle.is_some(), self.channel.is_some())
    }

    /// Snapshot for observers.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status(),
            own_code: self.own_code,
        }
    }

    #[must_use]
    pub fn startup(&self) -> StartupPhase {
        self.startup
    }

    pub(crate) fn set_startup(&mut self, phase: StartupPhase) {
        self.startup = phase;
    }

    #[must_use]
    pub fn handle(&self) -> Option<&dyn TransportHandle> {
        self.handle.as_deref()
    }

    #[must_use]
    pub fn channel(&self) -> Option<&dyn DataChannel> {
        self.channel.as_deref()
    }

    /// Remote of the held channel, if any.
    #[must_use]
    pub fn connected_to(&self) -> Option<&PeerIdentifier> {
        self.channel.as_ref().map(|channel| channel.remote())
    }

    pub(crate) fn adopt_handle(&mut self, handle: Box<dyn TransportHandle>) {
        self.handle = Some(handle);
    }

    pub(crate) fn adopt_channel(&mut self, channel: Box<dyn DataChannel>) {
        self.channel = Some(channel);
    }

    pub(crate) fn take_channel(&mut self) -> Option<Box<dyn DataChannel>> {
        self.channel.take()
    }

    /// Close the channel and destroy the handle, whichever are present.
    ///
    /// Returns the channel that was closed, if there was one.
    pub(crate) fn release(&mut self) -> Option<Box<dyn DataChannel>> {
        let channel = self.channel.take();
        if let Some(channel) = &channel {
            channel.close();
        }
        if let Some(handle) = self.handle.take() {
            debug!(identifier = %handle.identifier(), "Destroying transport handle");
            handle.destroy();
        }
        channel
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}
