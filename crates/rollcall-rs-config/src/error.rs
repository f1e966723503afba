//! Error types for config loading and validation.

use thiserror::Error;

/// Errors returned while loading or validating config.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    /// A variable is present but its value cannot be used.
    #[error("invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },
}
