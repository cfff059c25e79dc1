//! Error types for droprelay
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::TransportError;

/// Result type alias for droprelay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Main error type for droprelay operations
#[derive(Error, Debug)]
pub enum RelayError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    ConfigParse { file: PathBuf, message: String },

    /// Configuration parsed but failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No configuration file in any of the searched locations
    #[error("no configuration file found (searched: {searched})")]
    ConfigNotFound { searched: String },

    /// Filesystem watch could not be registered
    #[error("failed to watch {path}: {message}")]
    Watch { path: PathBuf, message: String },

    /// Tracing subscriber could not be installed
    #[error("failed to initialize logging: {0}")]
    Logging(String),

    /// Pipeline was started twice without an intervening stop
    #[error("relay pipeline is already running")]
    AlreadyStarted,

    /// Transport failure while delivering a file
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl RelayError {
    /// True when the error only reports a cancelled operation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RelayError::Transport(e) if e.is_cancelled())
    }
}
