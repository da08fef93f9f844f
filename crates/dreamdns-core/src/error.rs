//! Error types for the updater
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
///
/// Runtime failures fall into three classes (transport, protocol, parse)
/// that are all handled the same way: logged with context and abandoned
/// without retry. Only `Config` errors are fatal, and only at startup.
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level failure reaching the IP resolver or the provider
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered, but not with `result == "success"`
    #[error("provider returned {result:?} for {command}: {data}")]
    Protocol {
        /// API command that was attempted
        command: String,
        /// The `result` string the provider returned
        result: String,
        /// Diagnostic payload from the provider's `data` field
        data: String,
    },

    /// Malformed JSON in a provider response
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a protocol error from a non-success provider response
    pub fn protocol(
        command: impl Into<String>,
        result: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self::Protocol {
            command: command.into(),
            result: result.into(),
            data: data.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
