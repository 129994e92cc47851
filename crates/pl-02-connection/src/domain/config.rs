//! Session configuration value object.

use pl_01_identity::{IdentityNamespace, DEFAULT_NAMESPACE};
use shared_types::Code;

/// Configuration for one session and its driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Prefix for every identifier registered or dialed.
    pub namespace: String,
    /// Capacity of the driver's command channel.
    pub command_capacity: usize,
    /// Capacity of the broadcast bus the runtime creates for sessions.
    pub event_bus_capacity: usize,
    /// Register under this code instead of drawing a random one.
    pub fixed_code: Option<Code>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            command_capacity: 32,
            event_bus_capacity: 1000,
            fixed_code: None,
        }
    }
}

impl ConnectionConfig {
    /// Create a configuration for testing (small channels).
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            command_capacity: 4,
            event_bus_capacity: 64,
            ..Self::default()
        }
    }

    /// Same configuration pinned to `code`.
    #[must_use]
    pub fn with_fixed_code(mut self, code: Code) -> Self {
        self.fixed_code = Some(code);
        self
    }

    /// The identity namespace built from `namespace`.
    #[must_use]
    pub fn identity_namespace(&self) -> IdentityNamespace {
        IdentityNamespace::new(self.namespace.clone())
    }
}
