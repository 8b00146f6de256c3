//! Error types for the suite.

use thiserror::Error;

/// Errors that can occur loading or validating target definitions.
#[derive(Error, Debug)]
pub enum SuiteError {
    /// Failed to parse target definition TOML
    #[error("failed to parse target definition TOML in {path}: {source}")]
    ParseError {
        /// Path to the definition file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid target definition (validation failed)
    #[error("invalid target definition for {target_id}: {reason}")]
    ValidationError {
        /// Target ID being validated
        target_id: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Target definition directory not found
    #[error("target definitions directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while accessing target definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid target ID format
    #[error("invalid target ID: {0}")]
    InvalidId(#[from] usher_core::UsherError),
}

/// Result type for suite operations.
pub type Result<T> = std::result::Result<T, SuiteError>;
