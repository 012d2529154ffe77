//! Error types for dm-core

use crate::version::Version;
use thiserror::Error;

/// Core error type for dbmigrate
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Script file is missing or cannot be opened at registration time
    #[error("[E004] Couldn't open file: {path}")]
    ResourceNotFound { path: String },

    /// E005: Script file could not be read when its statements were needed
    #[error("[E005] Couldn't read script '{path}': {source}")]
    ResourceUnavailable {
        path: String,
        source: std::io::Error,
    },

    /// E006: Two scripts registered under the same version
    #[error("[E006] Duplicate migration version {version}: {path}")]
    DuplicateVersion { version: Version, path: String },

    /// E007: Version string could not be parsed
    #[error("[E007] Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    /// E008: IO error with file path context
    #[error("[E008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}
