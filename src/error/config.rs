//! Configuration error module.
//!
//! This module defines error types that may occur during configuration loading,
//! parsing, and validation operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error when the configuration file is missing.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Error when the configuration file cannot be read.
    #[error("Failed to read configuration file: {0}")]
    FileReadError(String),

    /// Error when parsing the configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    /// Error when validating the configuration.
    #[error("Configuration validation error in [{section}]: {message}")]
    ValidationError {
        /// Section of the configuration that failed
        section: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// Error when a configuration value has an invalid type.
    #[error("Invalid configuration value type for {key}: expected {expected}, got {actual}")]
    InvalidValueType {
        /// The key of the invalid value
        key: String,
        /// The expected type
        expected: String,
        /// The actual type
        actual: String,
    },

    /// Error when serializing a configuration for output.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(String),

    /// Other configuration errors.
    #[error("Configuration error: {0}")]
    Other(String),
}
