//! Error types for configuration resolution.

use crate::config::Violation;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while resolving a configuration.
///
/// `InvalidKey`, `TypeMismatch` and `UnknownField` are structural and abort a
/// resolution call immediately. `Validation` carries every violated rule at
/// once so an operator can fix all of them in one pass.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Invalid value for '{key}': expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Unknown field '{key}' in configuration")]
    UnknownField { key: String },

    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file {path}: {reason}")]
    FileParse { path: PathBuf, reason: String },

    #[error("Configuration validation failed with {} violation(s)", .0.len())]
    Validation(Vec<Violation>),
}

impl ConfigError {
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(
        key: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Violations carried by a `Validation` error, empty for every other variant.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation(violations) => violations,
            _ => &[],
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
