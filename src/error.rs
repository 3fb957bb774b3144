//! Error types for scopegate
//!
//! This module defines the error hierarchy used throughout the crate.
//! Configuration errors are startup-fatal; scope and admission errors are
//! terminal for the single connection attempt that raised them.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scope error: {0}")]
    Scope(#[from] ScopeError),

    #[error("Admission denied: {0}")]
    AdmissionDenied(#[from] AdmissionDenied),

    #[error("Claims error: {0}")]
    Claims(#[from] ClaimsError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid network range '{entry}': {reason}")]
    InvalidCidr { entry: String, reason: String },
}

/// A credential kind requires a namespace or database that was not supplied,
/// or the request reaches outside what the credential was issued for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("{level} credentials require a namespace")]
    MissingNamespace { level: &'static str },

    #[error("{level} credentials require a database")]
    MissingDatabase { level: &'static str },

    #[error("requested {field} '{requested}' is outside the granted '{granted}'")]
    ExceedsGrant {
        field: &'static str,
        requested: String,
        granted: String,
    },
}

/// Remote address did not match the allow-list, or could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("address '{address}' is not permitted to authenticate")]
pub struct AdmissionDenied {
    pub address: String,
}

impl AdmissionDenied {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// Errors converting untyped credential claims into typed claim values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("claim '{key}' has unsupported type {kind}")]
    Unsupported { key: String, kind: &'static str },

    #[error("claims must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for scope resolution
pub type ScopeResult<T> = std::result::Result<T, ScopeError>;
