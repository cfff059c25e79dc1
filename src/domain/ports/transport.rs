//! Transport Port
//!
//! Abstracts the authenticated remote session used for uploads.
//! The session manager owns exactly one session at a time and drives it
//! through these traits; the SFTP implementation lives in infrastructure.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::value_objects::{RemotePath, RemotePathError};

/// Failure while connecting or transferring
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// TCP connect or SSH handshake failed
    #[error("connection to {endpoint} failed: {message}")]
    Connect { endpoint: String, message: String },

    /// Credentials were rejected
    #[error("authentication as '{username}' failed: {message}")]
    Auth { username: String, message: String },

    /// Remote side failed during the transfer
    #[error("transfer failed: {0}")]
    Io(String),

    /// Local file could not be read
    #[error("cannot read local file {path}: {message}")]
    LocalFile { path: String, message: String },

    /// Remote target could not be derived
    #[error("invalid remote path: {0}")]
    InvalidPath(#[from] RemotePathError),

    /// Shutdown interrupted the operation
    #[error("operation cancelled")]
    Cancelled,

    /// The session manager was shut down
    #[error("transport is shut down")]
    Closed,
}

impl TransportError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }

    /// Whether the session that produced this error should be considered dead
    pub fn poisons_session(&self) -> bool {
        matches!(
            self,
            TransportError::Connect { .. } | TransportError::Auth { .. } | TransportError::Io(_)
        )
    }
}

/// A live authenticated session
#[async_trait]
pub trait TransportSession: Send {
    /// Cheap local liveness check; never touches the network
    fn is_connected(&self) -> bool;

    /// Liveness check before reuse; may round-trip to the server
    ///
    /// A false result means the session must be discarded.
    async fn check_alive(&mut self) -> bool {
        self.is_connected()
    }

    /// Stream `local` to `remote`, overwriting. Returns bytes written.
    async fn upload(
        &mut self,
        local: &Path,
        remote: &RemotePath,
        cancel: &CancellationToken,
    ) -> Result<u64, TransportError>;

    /// Best-effort disconnect
    async fn close(&mut self);
}

/// Factory for new sessions
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: TransportSession;

    /// Human-readable `user@host:port` for logs
    fn endpoint(&self) -> String;

    async fn connect(&self, cancel: &CancellationToken) -> Result<Self::Session, TransportError>;
}
