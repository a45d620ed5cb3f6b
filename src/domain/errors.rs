// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the flag adapter crate.
//!
//! This module defines the error types that can occur when reading flags, querying
//! configuration trees, or converting configuration values.
//! All errors use `thiserror` for proper error handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for configuration operations.
///
/// This enum represents all possible errors that can occur when reading flags,
/// accessing configuration values, or calling provider operations. It is marked as
/// `#[non_exhaustive]` to allow for future additions without breaking backwards
/// compatibility.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::errors::ConfigError;
///
/// fn get_config_value() -> Result<String, ConfigError> {
///     Err(ConfigError::ConfigKeyNotFound {
///         key: "database.host".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested configuration key was not found.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A value had a different shape than the one requested.
    #[error("Configuration value for key '{key}' is {found}, expected {expected}")]
    TypeMismatch {
        /// The key being accessed
        key: String,
        /// The kind of value that was requested
        expected: String,
        /// The kind of value that was found
        found: String,
    },

    /// A flag name was not registered in the flag set.
    #[error("Unknown flag: {name}")]
    UnknownFlag {
        /// The flag name that was looked up
        name: String,
    },

    /// The provider does not implement the requested operation.
    #[error("Provider '{provider}' does not support {operation}")]
    UnsupportedOperation {
        /// The name of the provider
        provider: String,
        /// The operation that was attempted
        operation: String,
    },

    /// Failed to parse configuration content.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ConfigError {
    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates an UnsupportedOperation error for the given provider.
    pub fn unsupported(provider: &str, operation: &str) -> Self {
        ConfigError::UnsupportedOperation {
            provider: provider.to_string(),
            operation: operation.to_string(),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
