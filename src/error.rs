//! Error types for vmbuild operations.
//!
//! This module defines [`BuildError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `BuildError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `BuildError::Other`) for unexpected errors
//! - A missing tool is a normal check result, not an error; the abort
//!   message is rendered from [`BuildError::MissingDependencies`]
//! - A command that exits non-zero is an `Ok` result, never an error

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for vmbuild operations.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// One or more required tools could not be resolved.
    #[error("Missing dependencies: {}", .missing.join(", "))]
    MissingDependencies { missing: Vec<String> },

    /// The child process could not be created at all.
    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for vmbuild operations.
pub type Result<T> = std::result::Result<T, BuildError>;
