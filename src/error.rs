//! Error types for pipeline operations.
//!
//! This module defines the top-level error type plus CLI-specific errors.
//! Step-level failures (provisioning, installation, packaging, publishing)
//! live in [`crate::pipeline::Error`] and convert into [`DistError`].

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, DistError>;

/// Main error type for all pipeline operations
#[derive(Error, Debug)]
pub enum DistError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest parsing errors
    #[error("Manifest error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Pipeline step failures
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}
