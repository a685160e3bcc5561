//! Domain error types
//!
//! This module defines the error hierarchy for the UMDF engine. Every failure
//! surfaces to the immediate caller as a typed [`UmdfError`]; adapters that need
//! a coarser signal narrow it through [`UmdfError::kind`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main UMDF error type
///
/// This is the primary error type used throughout the engine.
#[derive(Debug, Error)]
pub enum UmdfError {
    /// Target container already exists and the access policy forbids replacing it
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing container, encounter, module or trail entry
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credential check failed
    ///
    /// Carries no detail on purpose: callers must not learn which check failed.
    #[error("Access denied")]
    AccessDenied,

    /// Data does not conform to the schema
    #[error("Schema violation at '{path}': {message}")]
    SchemaViolation {
        /// First field path that failed
        path: String,
        /// What was wrong with it
        message: String,
    },

    /// Schema reference could not be resolved
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    /// Schema id of an update differs from the stored module's schema id
    #[error("Schema mismatch: expected '{expected}', found '{found}'")]
    SchemaMismatch {
        /// Schema id recorded for the module
        expected: String,
        /// Schema id supplied by the caller
        found: String,
    },

    /// Operation is not valid for the handle's current open/closed state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Container contents failed an integrity check
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Malformed caller input (bad identifier, mismatched module id, bad JSON shape)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Fieldless classification of [`UmdfError`]
///
/// Used by the boundary adapters to tag failures without exposing payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Conflict,
    NotFound,
    AccessDenied,
    SchemaViolation,
    UnknownSchema,
    SchemaMismatch,
    InvalidState,
    Integrity,
    Validation,
    Configuration,
    Serialization,
    Io,
}

impl UmdfError {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            UmdfError::Conflict(_) => ErrorKind::Conflict,
            UmdfError::NotFound(_) => ErrorKind::NotFound,
            UmdfError::AccessDenied => ErrorKind::AccessDenied,
            UmdfError::SchemaViolation { .. } => ErrorKind::SchemaViolation,
            UmdfError::UnknownSchema(_) => ErrorKind::UnknownSchema,
            UmdfError::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            UmdfError::InvalidState(_) => ErrorKind::InvalidState,
            UmdfError::Integrity(_) => ErrorKind::Integrity,
            UmdfError::Validation(_) => ErrorKind::Validation,
            UmdfError::Configuration(_) => ErrorKind::Configuration,
            UmdfError::Serialization(_) => ErrorKind::Serialization,
            UmdfError::Io(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for a schema violation at `path`
    pub fn violation(path: impl Into<String>, message: impl Into<String>) -> Self {
        UmdfError::SchemaViolation {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for UmdfError {
    fn from(err: std::io::Error) -> Self {
        UmdfError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for UmdfError {
    fn from(err: serde_json::Error) -> Self {
        UmdfError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for UmdfError {
    fn from(err: toml::de::Error) -> Self {
        UmdfError::Configuration(format!("TOML parse error: {err}"))
    }
}
