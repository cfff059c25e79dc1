//! In-process transport and delivery doubles.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use droprelay::domain::entities::UploadRequest;
use droprelay::domain::ports::{Connector, FileReadyHandler, TransportError, TransportSession};
use droprelay::domain::value_objects::RemotePath;
use droprelay::error::RelayResult;

/// Uploads seen by a `MemoryConnector`, as (remote path, contents)
#[derive(Default)]
pub struct RemoteStore {
    pub files: Mutex<Vec<(String, Vec<u8>)>>,
    pub connects: AtomicUsize,
}

impl RemoteStore {
    pub fn paths(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

/// Connector whose sessions copy files into a `RemoteStore`
///
/// Any local file whose name starts with `reject` fails to upload.
pub struct MemoryConnector {
    pub store: Arc<RemoteStore>,
}

pub struct MemorySession {
    store: Arc<RemoteStore>,
}

#[async_trait]
impl TransportSession for MemorySession {
    fn is_connected(&self) -> bool {
        true
    }

    async fn upload(
        &mut self,
        local: &Path,
        remote: &RemotePath,
        _cancel: &CancellationToken,
    ) -> Result<u64, TransportError> {
        let name = local.file_name().unwrap_or_default().to_string_lossy();
        if name.starts_with("reject") {
            return Err(TransportError::Io(format!("{}: permission denied", remote)));
        }
        let bytes = std::fs::read(local).map_err(|e| TransportError::LocalFile {
            path: local.display().to_string(),
            message: e.to_string(),
        })?;
        let len = bytes.len() as u64;
        self.store
            .files
            .lock()
            .unwrap()
            .push((remote.to_string(), bytes));
        Ok(len)
    }

    async fn close(&mut self) {}
}

#[async_trait]
impl Connector for MemoryConnector {
    type Session = MemorySession;

    fn endpoint(&self) -> String {
        "relay@memory:22".to_string()
    }

    async fn connect(&self, _cancel: &CancellationToken) -> Result<MemorySession, TransportError> {
        self.store.connects.fetch_add(1, Ordering::SeqCst);
        Ok(MemorySession {
            store: Arc::clone(&self.store),
        })
    }
}

/// Delivery callback that only records what it was handed
#[derive(Default)]
pub struct Recorder {
    pub requests: Mutex<Vec<UploadRequest>>,
}

impl Recorder {
    pub fn requests(&self) -> Vec<UploadRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileReadyHandler for Recorder {
    async fn on_file_ready(
        &self,
        request: UploadRequest,
        _cancel: CancellationToken,
    ) -> RelayResult<()> {
        self.requests.lock().unwrap().push(request);
        Ok(())
    }
}

/// Poll `condition` every 50 ms for up to `timeout_ms`
pub async fn wait_until<F: Fn() -> bool>(timeout_ms: u64, condition: F) -> bool {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_millis(timeout_ms);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    condition()
}
