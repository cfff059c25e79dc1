//! SFTP Transport
//!
//! Implements the transport ports with libssh2 (`ssh2` crate). libssh2 is
//! blocking, so every network call runs on tokio's blocking pool. One SSH
//! session is kept per `SftpSession`; each upload opens the `sftp` subsystem
//! on that session, streams the file in chunks and closes the channel.
//!
//! libssh2 keeps reporting a session as authenticated after the server has
//! hung up, so reuse is gated on a keepalive plus an `sftp` channel open.
//!
//! Cancellation is checked between chunks, so an aborted transfer may leave a
//! partial file on the remote side.

use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ssh2::Session;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::ports::{Connector, TransportError, TransportSession};
use crate::domain::value_objects::RemotePath;

/// Upload chunk size
const CHUNK_SIZE: usize = 64 * 1024;

/// Interval libssh2 uses when deciding whether a keepalive is due
const KEEPALIVE_INTERVAL_SECS: u32 = 30;

/// How the session authenticates
#[derive(Clone)]
pub enum SftpCredentials {
    Password(String),
    PrivateKey {
        path: PathBuf,
        passphrase: Option<String>,
    },
}

impl fmt::Debug for SftpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SftpCredentials::Password(_) => f.write_str("Password(..)"),
            SftpCredentials::PrivateKey { path, .. } => f
                .debug_struct("PrivateKey")
                .field("path", path)
                .finish_non_exhaustive(),
        }
    }
}

/// Validated connection parameters
#[derive(Debug, Clone)]
pub struct SftpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub credentials: SftpCredentials,
    pub connect_timeout: Duration,
}

impl SftpSettings {
    fn endpoint(&self) -> String {
        format!("{}@{}:{}", self.username, self.host, self.port)
    }
}

/// Opens authenticated SSH sessions for SFTP uploads
#[derive(Debug, Clone)]
pub struct SftpConnector {
    settings: Arc<SftpSettings>,
}

impl SftpConnector {
    pub fn new(settings: SftpSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl Connector for SftpConnector {
    type Session = SftpSession;

    fn endpoint(&self) -> String {
        self.settings.endpoint()
    }

    async fn connect(&self, cancel: &CancellationToken) -> Result<SftpSession, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        let settings = Arc::clone(&self.settings);
        let handshake = tokio::task::spawn_blocking(move || open_session(&settings));

        // A cancelled handshake keeps running on the blocking pool and its
        // session is dropped when it finishes.
        let session = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            joined = handshake => joined.map_err(|e| TransportError::Connect {
                endpoint: self.endpoint(),
                message: e.to_string(),
            })??,
        };

        Ok(SftpSession {
            session,
            healthy: Arc::new(AtomicBool::new(true)),
        })
    }
}

fn open_session(settings: &SftpSettings) -> Result<Session, TransportError> {
    let endpoint = settings.endpoint();
    let connect_err = |message: String| TransportError::Connect {
        endpoint: endpoint.clone(),
        message,
    };

    let addr = (settings.host.as_str(), settings.port)
        .to_socket_addrs()
        .map_err(|e| connect_err(e.to_string()))?
        .next()
        .ok_or_else(|| connect_err("host did not resolve".to_string()))?;

    let tcp = TcpStream::connect_timeout(&addr, settings.connect_timeout)
        .map_err(|e| connect_err(e.to_string()))?;

    let mut session = Session::new().map_err(|e| connect_err(e.to_string()))?;
    session.set_timeout(u32::try_from(settings.connect_timeout.as_millis()).unwrap_or(u32::MAX));
    session.set_tcp_stream(tcp);
    session.handshake().map_err(|e| connect_err(e.to_string()))?;
    session.set_keepalive(true, KEEPALIVE_INTERVAL_SECS);

    let auth_err = |message: String| TransportError::Auth {
        username: settings.username.clone(),
        message,
    };
    match &settings.credentials {
        SftpCredentials::Password(password) => session
            .userauth_password(&settings.username, password)
            .map_err(|e| auth_err(e.to_string()))?,
        SftpCredentials::PrivateKey { path, passphrase } => session
            .userauth_pubkey_file(&settings.username, None, path, passphrase.as_deref())
            .map_err(|e| auth_err(e.to_string()))?,
    }

    if !session.authenticated() {
        return Err(auth_err("server did not accept credentials".to_string()));
    }

    debug!(endpoint = %endpoint, "SSH handshake and authentication complete");
    Ok(session)
}

/// One authenticated SSH session
pub struct SftpSession {
    session: Session,
    healthy: Arc<AtomicBool>,
}

#[async_trait]
impl TransportSession for SftpSession {
    fn is_connected(&self) -> bool {
        self.healthy.load(Ordering::SeqCst) && self.session.authenticated()
    }

    async fn check_alive(&mut self) -> bool {
        if !self.is_connected() {
            return false;
        }

        let session = self.session.clone();
        let alive = match tokio::task::spawn_blocking(move || round_trip(&session)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!(error = %e, "Session failed liveness check");
                false
            }
            Err(e) => {
                debug!(error = %e, "Liveness check did not complete");
                false
            }
        };

        if !alive {
            self.healthy.store(false, Ordering::SeqCst);
        }
        alive
    }

    async fn upload(
        &mut self,
        local: &Path,
        remote: &RemotePath,
        cancel: &CancellationToken,
    ) -> Result<u64, TransportError> {
        let session = self.session.clone();
        let healthy = Arc::clone(&self.healthy);
        let local = local.to_path_buf();
        let remote = remote.clone();
        let cancel = cancel.clone();

        let joined = tokio::task::spawn_blocking(move || {
            let result = copy_to_remote(&session, &local, &remote, &cancel);
            if let Err(e) = &result {
                if e.poisons_session() {
                    healthy.store(false, Ordering::SeqCst);
                }
            }
            result
        })
        .await;

        joined.map_err(|e| TransportError::Io(e.to_string()))?
    }

    async fn close(&mut self) {
        self.healthy.store(false, Ordering::SeqCst);
        let session = self.session.clone();
        let _ = tokio::task::spawn_blocking(move || {
            if let Err(e) = session.disconnect(None, "droprelay closing", None) {
                debug!(error = %e, "Disconnect failed");
            }
        })
        .await;
    }
}

/// Forces traffic on the session; fails once the server has gone away
fn round_trip(session: &Session) -> Result<(), ssh2::Error> {
    session.keepalive_send()?;
    session.sftp().map(drop)
}

fn copy_to_remote(
    session: &Session,
    local: &Path,
    remote: &RemotePath,
    cancel: &CancellationToken,
) -> Result<u64, TransportError> {
    let local_err = |e: std::io::Error| TransportError::LocalFile {
        path: local.display().to_string(),
        message: e.to_string(),
    };

    let mut source = File::open(local).map_err(local_err)?;
    let sftp = session
        .sftp()
        .map_err(|e| TransportError::Io(e.to_string()))?;
    // create = WRITE | CREATE | TRUNCATE, so an existing file is overwritten
    let mut target = sftp
        .create(Path::new(remote.as_str()))
        .map_err(|e| TransportError::Io(format!("{}: {}", remote, e)))?;

    copy_chunks(&mut source, &mut target, local, remote, cancel)
}

/// Stream `src` into `dst` in `CHUNK_SIZE` pieces, checking `cancel` between chunks
///
/// Read failures are reported against `local`, write failures against
/// `remote`. A cancelled copy leaves whatever was already written.
fn copy_chunks(
    src: &mut impl Read,
    dst: &mut impl Write,
    local: &Path,
    remote: &RemotePath,
    cancel: &CancellationToken,
) -> Result<u64, TransportError> {
    let remote_err = |e: std::io::Error| TransportError::Io(format!("{}: {}", remote, e));

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut written = 0u64;
    loop {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        let n = src.read(&mut buf).map_err(|e| TransportError::LocalFile {
            path: local.display().to_string(),
            message: e.to_string(),
        })?;
        if n == 0 {
            break;
        }
        dst.write_all(&buf[..n]).map_err(remote_err)?;
        written += n as u64;
    }
    dst.flush().map_err(remote_err)?;

    Ok(written)
}
