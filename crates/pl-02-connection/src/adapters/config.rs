use crate::domain::ConnectionConfig;
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - Hardcoded config for testing/development
// ============================================================================

/// Static configuration provider with hardcoded values.
///
/// Useful for testing and development. For deployments, use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: ConnectionConfig,
    log_level: Option<String>,
}

impl StaticConfigProvider {
    /// Create with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given session config.
    #[must_use]
    pub fn with_config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Request a log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn get_connection_config(&self) -> ConnectionConfig {
        self.config.clone()
    }

    fn get_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

// ============================================================================
// TomlConfigProvider - Config file loading (requires "toml-config" feature)
// ============================================================================

#[cfg(feature = "toml-config")]
mod toml_config {
    use super::*;
    use serde::Deserialize;
    use shared_types::Code;
    use std::fs;
    use std::path::Path;
    use thiserror::Error;

    #[derive(Debug, Deserialize)]
    struct ConfigFile {
        #[serde(default)]
        session: SessionSection,
        #[serde(default)]
        logging: LoggingSection,
    }

    #[derive(Debug, Deserialize, Default)]
    struct SessionSection {
        namespace: Option<String>,
        command_capacity: Option<usize>,
        event_bus_capacity: Option<usize>,
        fixed_code: Option<u32>,
    }

    #[derive(Debug, Deserialize, Default)]
    struct LoggingSection {
        level: Option<String>,
    }

    /// TOML-based configuration provider.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [session]
    /// namespace = "p2p-link-"
    /// command_capacity = 32
    /// event_bus_capacity = 1000
    /// fixed_code = 12345
    ///
    /// [logging]
    /// level = "info"
    /// ```
    ///
    /// Every key is optional; missing keys keep their defaults.
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        config: ConnectionConfig,
        log_level: Option<String>,
    }

    impl TomlConfigProvider {
        /// Load configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// Returns error if the file cannot be read, parsed or holds an
        /// invalid code.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse configuration from a TOML string.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let defaults = ConnectionConfig::default();
            let section = file.session;
            let fixed_code = section
                .fixed_code
                .map(Code::new)
                .transpose()
                .map_err(|e| ConfigError::Invalid(format!("session.fixed_code: {e}")))?;

            let config = ConnectionConfig {
                namespace: section.namespace.unwrap_or(defaults.namespace),
                command_capacity: section.command_capacity.unwrap_or(defaults.command_capacity),
                event_bus_capacity: section
                    .event_bus_capacity
                    .unwrap_or(defaults.event_bus_capacity),
                fixed_code,
            };

            Ok(Self {
                config,
                log_level: file.logging.level,
            })
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn get_connection_config(&self) -> ConnectionConfig {
            self.config.clone()
        }

        fn get_log_level(&self) -> Option<String> {
            self.log_level.clone()
        }
    }

    /// Errors that can occur during config loading.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum ConfigError {
        /// File I/O error.
        #[error("Failed to read {path}: {error}")]
        Io {
            /// Path of the file that failed to load.
            path: String,
            /// Error message from the I/O operation.
            error: String,
        },
        /// TOML parsing error.
        #[error("Failed to parse config: {0}")]
        Parse(String),
        /// Well-formed TOML with an unusable value.
        #[error("Invalid config value: {0}")]
        Invalid(String),
    }

}

#[cfg(feature = "toml-config")]
pub use toml_config::{ConfigError, TomlConfigProvider};
