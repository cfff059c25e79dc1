//! Transport session manager

use std::path::Path;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domain::ports::{Connector, TransportError, TransportSession};
use crate::domain::value_objects::RemotePath;

/// Observable state of the shared session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Disconnected,
    Connecting,
    Connected,
    Closed,
}

enum SessionState<S> {
    Disconnected,
    Connecting,
    Connected(S),
}

/// Everything behind the admission gate
struct Gate<S> {
    state: SessionState<S>,
    closed: bool,
}

/// Owns one lazily established session shared by all uploads
///
/// The session and its state are only reachable through `gate`, a mutex of
/// capacity one. The gate is held across connect *and* transfer, so uploads
/// are serialized end to end.
pub struct SessionManager<C: Connector> {
    connector: C,
    gate: Mutex<Gate<C::Session>>,
}

impl<C: Connector> SessionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            gate: Mutex::new(Gate {
                state: SessionState::Disconnected,
                closed: false,
            }),
        }
    }

    /// Upload `local_path` into `remote_folder`, reusing or re-establishing the session
    ///
    /// Failures are logged here with both paths and then returned; nothing is
    /// swallowed.
    pub async fn upload(
        &self,
        local_path: &Path,
        remote_folder: &str,
        cancel: &CancellationToken,
    ) -> Result<u64, TransportError> {
        let result = self.upload_gated(local_path, remote_folder, cancel).await;

        match &result {
            Ok(bytes) => info!(
                path = %local_path.display(),
                remote_folder,
                bytes,
                "Upload complete"
            ),
            Err(e) if e.is_cancelled() => debug!(
                path = %local_path.display(),
                remote_folder,
                "Upload cancelled"
            ),
            Err(e) => error!(
                path = %local_path.display(),
                remote_folder,
                error = %e,
                "Upload failed"
            ),
        }

        result
    }

    async fn upload_gated(
        &self,
        local_path: &Path,
        remote_folder: &str,
        cancel: &CancellationToken,
    ) -> Result<u64, TransportError> {
        let remote_path = RemotePath::for_upload(remote_folder, local_path)?;

        let mut gate = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            gate = self.gate.lock() => gate,
        };

        if gate.closed {
            return Err(TransportError::Closed);
        }

        let mut session = match std::mem::replace(&mut gate.state, SessionState::Disconnected) {
            SessionState::Connected(mut current) => {
                if current.check_alive().await {
                    current
                } else {
                    debug!(endpoint = %self.connector.endpoint(), "Session dropped; reconnecting");
                    current.close().await;
                    self.connect(&mut gate, cancel).await?
                }
            }
            SessionState::Disconnected | SessionState::Connecting => {
                self.connect(&mut gate, cancel).await?
            }
        };

        debug!(
            path = %local_path.display(),
            remote_path = %remote_path,
            "Transferring"
        );
        let result = session.upload(local_path, &remote_path, cancel).await;
        gate.state = SessionState::Connected(session);
        result
    }

    /// Must be called with the gate held; leaves the state `Disconnected` on failure.
    async fn connect(
        &self,
        gate: &mut Gate<C::Session>,
        cancel: &CancellationToken,
    ) -> Result<C::Session, TransportError> {
        gate.state = SessionState::Connecting;

        let connected = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = self.connector.connect(cancel) => result,
        };

        gate.state = SessionState::Disconnected;
        let session = connected?;
        info!(endpoint = %self.connector.endpoint(), "Session established");
        Ok(session)
    }

    /// Current session state, read under the gate
    pub async fn status(&self) -> SessionStatus {
        let gate = self.gate.lock().await;
        if gate.closed {
            return SessionStatus::Closed;
        }
        match &gate.state {
            SessionState::Disconnected => SessionStatus::Disconnected,
            SessionState::Connecting => SessionStatus::Connecting,
            SessionState::Connected(session) if session.is_connected() => {
                SessionStatus::Connected
            }
            SessionState::Connected(_) => SessionStatus::Disconnected,
        }
    }

    /// Dispose the session and refuse further uploads
    ///
    /// Waits for an in-flight upload to release the gate first.
    pub async fn shutdown(&self) {
        let mut gate = self.gate.lock().await;
        if let SessionState::Connected(mut session) =
            std::mem::replace(&mut gate.state, SessionState::Disconnected)
        {
            session.close().await;
            info!(endpoint = %self.connector.endpoint(), "Session closed");
        }
        gate.closed = true;
    }

    /// `shutdown` bounded by `limit`; false if the gate was still held when it ran out
    ///
    /// On timeout the in-flight transfer keeps the session and nothing is closed.
    pub async fn shutdown_within(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.shutdown()).await.is_ok()
    }
}
