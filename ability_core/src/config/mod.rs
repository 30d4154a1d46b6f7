//! Configuration loading for abilities and combat constants

mod abilities;
pub mod constants;

pub use abilities::{AbilitiesConfig, AbilityConfig};
pub use constants::{CombatConstants, DamageConstants, HitConstants};

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Parse error in '{path:?}': {error}")]
    Parse {
        error: toml::de::Error,
        path: Option<PathBuf>,
    },
    #[error("Validation error in '{path:?}': {message}")]
    Validation {
        message: String,
        path: Option<PathBuf>,
    },
}

impl ConfigError {
    /// Validation error not tied to a file
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ConfigError::Validation {
            message: message.into(),
            path: None,
        }
    }

    /// Attach `path` to an error that doesn't carry one yet
    pub(crate) fn at(self, path: &Path) -> Self {
        match self {
            ConfigError::Parse { error, path: None } => ConfigError::Parse {
                error,
                path: Some(path.to_path_buf()),
            },
            ConfigError::Validation {
                message,
                path: None,
            } => ConfigError::Validation {
                message,
                path: Some(path.to_path_buf()),
            },
            other => other,
        }
    }
}

/// Read and deserialize a TOML file
pub(crate) fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        error: e,
        path: path.to_path_buf(),
    })?;
    parse_toml(&content).map_err(|e| e.at(path))
}

/// Deserialize a TOML string
pub(crate) fn parse_toml<T: DeserializeOwned>(toml: &str) -> Result<T, ConfigError> {
    toml::from_str(toml).map_err(|e| ConfigError::Parse { error: e, path: None })
}
