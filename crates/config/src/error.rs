//! Error types for configuration operations.
//!
//! This module defines the error types that can occur during configuration
//! loading, parsing, and validation.

use std::path::PathBuf;

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a configuration file.
    #[error("failed to write config file at {path}: {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON5 configuration.
    #[error("failed to parse config: {0}")]
    ParseJson5(#[from] serde_json5::Error),

    /// Failed to serialize configuration to JSON.
    #[error("failed to serialize config: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// A URL setting is not an absolute http(s) URL.
    #[error("invalid URL for {field}: {value}")]
    InvalidUrl {
        /// The setting that holds the URL.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The request timeout is outside the allowed range.
    #[error("invalid request timeout: {reason}")]
    InvalidTimeout {
        /// The reason the timeout is invalid.
        reason: String,
    },

    /// The session settings are unusable.
    #[error("invalid session settings: {reason}")]
    InvalidSession {
        /// The reason the settings are invalid.
        reason: String,
    },

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_url() {
        let err = ConfigError::InvalidUrl {
            field: "api_base_url",
            value: "ftp://x".to_string(),
        };
        assert_eq!(err.to_string(), "invalid URL for api_base_url: ftp://x");
    }

    #[test]
    fn display_invalid_timeout() {
        let err = ConfigError::InvalidTimeout {
            reason: "0 is below minimum".to_string(),
        };
        assert_eq!(err.to_string(), "invalid request timeout: 0 is below minimum");
    }
}
