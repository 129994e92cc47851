//! Identifier namespacing.
//!
//! Every identifier a session registers or dials is `prefix + code`. The
//! prefix keeps Peer-Link sessions apart from anything else sharing the same
//! signaling service.

use shared_types::{Code, PeerIdentifier};
use tracing::trace;

use crate::code::generate_code;

/// Prefix used when no namespace is configured.
pub const DEFAULT_NAMESPACE: &str = "p2p-link-";

/// A fixed prefix under which codes are turned into transport identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityNamespace {
    prefix: String,
}

impl IdentityNamespace {
    /// Create a namespace with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix prepended to every code.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Derive the identifier for `code`, or for a freshly drawn code when
    /// `None` is given.
    #[must_use]
    pub fn derive(&self, code: Option<Code>) -> PeerIdentifier {
        let code = code.unwrap_or_else(generate_code);
        let identifier = PeerIdentifier::new(format!("{}{}", self.prefix, code));
        trace!(%code, %identifier, "Derived peer identifier");
        identifier
    }

    /// Recover the code from an identifier carrying this namespace.
    ///
    /// Returns `None` for foreign identifiers or a malformed suffix.
    #[must_use]
    pub fn code_of(&self, identifier: &PeerIdentifier) -> Option<Code> {
        identifier
            .as_str()
            .strip_prefix(self.prefix.as_str())?
            .parse()
            .ok()
    }
}

impl Default for IdentityNamespace {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

/// Derive an identifier under [`DEFAULT_NAMESPACE`].
#[must_use]
pub fn derive_identifier(code: Option<Code>) -> PeerIdentifier {
    IdentityNamespace::default().derive(code)
}
