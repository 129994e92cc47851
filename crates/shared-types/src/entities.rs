//! # Core Domain Entities
//!
//! Defines the vocabulary shared by every Peer-Link crate.
//!
//! ## Clusters
//!
//! - **Identity**: `Code`, `PeerIdentifier`
//! - **Channels**: `ChannelId`
//! - **Session**: `SessionStatus`, `SessionSnapshot`

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CodeError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// The 5-digit rendezvous token a user shares out-of-band.
///
/// A `Code` is always within `[Code::MIN, Code::MAX]`; the only way to build
/// one is through a range-checked constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Code(u32);

impl Code {
    /// Smallest valid code.
    pub const MIN: u32 = 10_000;
    /// Largest valid code.
    pub const MAX: u32 = 99_999;

    /// Build a code, rejecting values outside `[MIN, MAX]`.
    pub fn new(value: u32) -> Result<Self, CodeError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CodeError::OutOfRange(i64::from(value)))
        }
    }

    /// Numeric value of the code.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Whether an arbitrary integer falls inside the code range.
    #[must_use]
    pub fn in_range(value: i64) -> bool {
        (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value)
    }
}

impl TryFrom<u32> for Code {
    type Error = CodeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Code> for u32 {
    fn from(code: Code) -> Self {
        code.0
    }
}

impl FromStr for Code {
    type Err = CodeError;

    /// Parses the whole string as an integer; trailing characters are rejected.
    ///
    /// Digit strings too long for an `i64` are out of range, reported with
    /// the saturated value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.parse().map_err(|error: ParseIntError| match error.kind() {
            IntErrorKind::PosOverflow => CodeError::OutOfRange(i64::MAX),
            IntErrorKind::NegOverflow => CodeError::OutOfRange(i64::MIN),
            _ => CodeError::NotNumeric(s.to_string()),
        })?;
        let value = u32::try_from(value).map_err(|_| CodeError::OutOfRange(value))?;
        Self::new(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Namespaced string used to address a peer on the transport layer.
///
/// Derived from a namespace prefix and a [`Code`]; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerIdentifier(String);

impl PeerIdentifier {
    /// Wrap a raw identifier string (as delivered by the transport).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PeerIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// CLUSTER B: CHANNELS
// =============================================================================

/// Transport-assigned identifier of a single channel request.
///
/// Correlates data and close notifications with the channel they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(Uuid);

impl ChannelId {
    /// Allocate a fresh random channel id.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CLUSTER C: SESSION
// =============================================================================

/// Externally visible state of a session.
///
/// Always derived from two facts (transport ready, channel present); never
/// stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No transport handle.
    Disconnected,
    /// Transport ready, no channel.
    Initialized,
    /// Transport ready and one channel held.
    Connected,
}

impl SessionStatus {
    /// Derive the status from the two observable facts.
    ///
    /// A channel without a transport handle cannot exist; it maps to
    /// `Disconnected` like any other state without a handle.
    #[must_use]
    pub fn derive(transport_ready: bool, channel_present: bool) -> Self {
        match (transport_ready, channel_present) {
            (false, _) => Self::Disconnected,
            (true, false) => Self::Initialized,
            (true, true) => Self::Connected,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Initialized => write!(f, "initialized"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// Read-only view handed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Derived session status.
    pub status: SessionStatus,
    /// This session's own rendezvous code.
    pub own_code: Code,
}

impl SessionSnapshot {
    /// Snapshot of a session that has not reached the transport yet.
    #[must_use]
    pub fn disconnected(own_code: Code) -> Self {
        Self {
            status: SessionStatus::Disconnected,
            own_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_bounds() {
        assert!(Code::new(10_000).is_ok());
        assert!(Code::new(99_999).is_ok());
        assert_eq!(Code::new(9_999), Err(CodeError::OutOfRange(9_999)));
        assert_eq!(Code::new(100_000), Err(CodeError::OutOfRange(100_000)));
    }

    #[test]
    fn test_code_from_str_rejects_trailing_characters() {
        assert_eq!("12345".parse::<Code>().map(|c| c.value()), Ok(12_345));
        assert!(matches!(
            "99999a".parse::<Code>(),
            Err(CodeError::NotNumeric(_))
        ));
        assert!(matches!("".parse::<Code>(), Err(CodeError::NotNumeric(_))));
        assert_eq!("-5".parse::<Code>(), Err(CodeError::OutOfRange(-5)));
        assert_eq!(
            "1234567890123456789012345".parse::<Code>(),
            Err(CodeError::OutOfRange(i64::MAX))
        );
        assert_eq!(
            "-1234567890123456789012345".parse::<Code>(),
            Err(CodeError::OutOfRange(i64::MIN))
        );
    }

    #[test]
    fn test_code_try_from_and_display() {
        let code = Code::try_from(12_345).expect("valid");
        assert_eq!(code.to_string(), "12345");
        assert_eq!(u32::from(code), 12_345);
        assert!(Code::try_from(5).is_err());
    }

    #[test]
    fn test_status_truth_table() {
        assert_eq!(SessionStatus::derive(false, false), SessionStatus::Disconnected);
        assert_eq!(SessionStatus::derive(true, false), SessionStatus::Initialized);
        assert_eq!(SessionStatus::derive(true, true), SessionStatus::Connected);
        assert_eq!(SessionStatus::derive(false, true), SessionStatus::Disconnected);
    }

    #[test]
    fn test_channel_ids_are_unique() {
        assert_ne!(ChannelId::random(), ChannelId::random());
    }
}
