//! Error types for portmatrix.
//!
//! Parsing is deliberately infallible: an unparsable line is skipped with a
//! diagnostic, a missing table degrades its join fields to empty. The only
//! errors that surface are device-level failures from the external session
//! collaborator, which remove one device's contribution from the run.

use std::time::Duration;

use thiserror::Error;

/// Main error type for portmatrix operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Device session errors from the external collaborator
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Device session errors (connection, command execution).
///
/// Returned by implementations of the session traits; the report assembler
/// folds them into the job log rather than aborting the run.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Failed to connect to the device
    #[error("Connection failed to {host}: {message}")]
    ConnectionFailed { host: String, message: String },

    /// Authentication was rejected
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Command execution failed
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Session was closed unexpectedly
    #[error("Session closed")]
    Closed,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type alias using portmatrix's Error.
pub type Result<T> = std::result::Result<T, Error>;
