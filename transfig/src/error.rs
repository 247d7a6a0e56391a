//! Error types for typed access and configuration
//!
//! The store itself never fails; these errors only arise at its edges,
//! where stored JSON is converted to and from Rust types, or where a
//! configuration file is read.

use crate::path::Path;
use thiserror::Error;

/// Typed access errors
#[derive(Debug, Error)]
pub enum StateError {
    /// Nothing is stored at the path
    #[error("No value at {0}")]
    NotFound(Path),

    /// The stored value does not deserialize into the requested type
    #[error("Value at {path} has an unexpected type: {source}")]
    TypeMismatch {
        /// Path that was read
        path: Path,
        /// Underlying conversion error
        #[source]
        source: serde_json::Error,
    },

    /// The value to store could not be serialized
    #[error("Cannot store value at {path}: {source}")]
    Serialize {
        /// Path that was written
        path: Path,
        /// Underlying conversion error
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Result type using StateError
pub type Result<T> = std::result::Result<T, StateError>;
