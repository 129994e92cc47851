//! # Runtime Configuration
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. the TOML file named by `PL_CONFIG` (see `TomlConfigProvider`)
//! 3. `PL_NAMESPACE`, `PL_LOG_LEVEL`, `PL_CODE_A`, `PL_CODE_B`

use std::path::PathBuf;

use pl_01_identity::{generate_code, parse_code};
use pl_02_connection::{ConfigError, ConfigProvider, ConnectionConfig, TomlConfigProvider};
use shared_types::{Code, CodeError};
use thiserror::Error;
use tracing::info;

/// Configuration file path.
pub const ENV_CONFIG: &str = "PL_CONFIG";
/// Identifier prefix override.
pub const ENV_NAMESPACE: &str = "PL_NAMESPACE";
/// Log filter override.
pub const ENV_LOG_LEVEL: &str = "PL_LOG_LEVEL";
/// Code for devnet peer A.
pub const ENV_CODE_A: &str = "PL_CODE_A";
/// Code for devnet peer B.
pub const ENV_CODE_B: &str = "PL_CODE_B";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Settings shared by every session.
    pub connection: ConnectionConfig,
    /// Code for peer A (random when unset).
    pub code_a: Option<Code>,
    /// Code for peer B (random when unset).
    pub code_b: Option<Code>,
    /// Level from `PL_LOG_LEVEL`.
    env_log_level: Option<String>,
    /// Level from the `[logging]` table.
    file_log_level: Option<String>,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    /// The config file could not be loaded.
    #[error(transparent)]
    File(#[from] ConfigError),

    /// An environment variable held an unusable code.
    #[error("{var}: {reason}")]
    InvalidCode {
        /// Variable name.
        var: &'static str,
        /// Why the value was rejected.
        reason: CodeError,
    },

    /// Both peers were given the same code.
    #[error("peer A and peer B cannot share code {0}")]
    DuplicateCodes(Code),
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, RuntimeConfigError> {
        Self::from_env(|var| std::env::var(var).ok())
    }

    /// Load using `env` as the environment.
    pub fn from_env(env: impl Fn(&str) -> Option<String>) -> Result<Self, RuntimeConfigError> {
        let mut config = Self::default();

        if let Some(path) = env(ENV_CONFIG).map(PathBuf::from) {
            let provider = TomlConfigProvider::load(&path)?;
            config.connection = provider.get_connection_config();
            config.file_log_level = provider.get_log_level();
            info!(path = %path.display(), "Loaded configuration file");
        }

        if let Some(namespace) = env(ENV_NAMESPACE) {
            config.connection.namespace = namespace;
        }
        config.env_log_level = env(ENV_LOG_LEVEL);
        config.code_a = parse_env_code(&env, ENV_CODE_A)?;
        config.code_b = parse_env_code(&env, ENV_CODE_B)?;

        if let (Some(a), Some(b)) = (config.code_a, config.code_b) {
            if a == b {
                return Err(RuntimeConfigError::DuplicateCodes(a));
            }
        }
        Ok(config)
    }

    /// Filter directive for the log subscriber.
    ///
    /// `PL_LOG_LEVEL`, then `rust_log` (the `RUST_LOG` value), then the
    /// config file, then `info`.
    #[must_use]
    pub fn log_directive(&self, rust_log: Option<&str>) -> String {
        self.env_log_level
            .as_deref()
            .or(rust_log)
            .or(self.file_log_level.as_deref())
            .unwrap_or("info")
            .to_string()
    }

    /// Codes for peers A and B, drawing whichever are unset.
    ///
    /// The two codes always differ.
    #[must_use]
    pub fn peer_codes(&self) -> (Code, Code) {
        let a = self.code_a.unwrap_or_else(generate_code);
        let b = match self.code_b {
            Some(b) => b,
            None => loop {
                let b = generate_code();
                if b != a {
                    break b;
                }
            },
        };
        (a, b)
    }

    /// Session config pinned to `code`.
    #[must_use]
    pub fn session_config(&self, code: Code) -> ConnectionConfig {
        self.connection.clone().with_fixed_code(code)
    }
}

fn parse_env_code(
    env: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Code>, RuntimeConfigError> {
    env(var)
        .map(|value| parse_code(value).map_err(|reason| RuntimeConfigError::InvalidCode { var, reason }))
        .transpose()
}
