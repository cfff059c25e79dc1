//! Delivery with failure containment

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::domain::entities::UploadRequest;
use crate::domain::ports::FileReadyHandler;

/// Invokes the delivery callback and contains its failures
///
/// A failing file is logged with its path and remote folder; the error goes
/// no further, so independent files never affect each other.
#[derive(Clone)]
pub struct Dispatcher {
    handler: Arc<dyn FileReadyHandler>,
}

impl Dispatcher {
    pub fn new(handler: Arc<dyn FileReadyHandler>) -> Self {
        Self { handler }
    }

    /// Returns whether the callback reported success
    pub async fn deliver(&self, request: UploadRequest, cancel: CancellationToken) -> bool {
        let path = request.local_path().to_path_buf();
        let remote_folder = request.remote_folder().to_string();

        match self.handler.on_file_ready(request, cancel).await {
            Ok(()) => {
                debug!(path = %path.display(), remote_folder, "Delivered");
                true
            }
            Err(e) if e.is_cancelled() => {
                debug!(path = %path.display(), "Delivery cancelled");
                false
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    remote_folder,
                    error = %e,
                    "Delivery failed"
                );
                false
            }
        }
    }
}
