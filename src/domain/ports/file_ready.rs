//! File Ready Port
//!
//! The single delivery callback invoked once per stabilized file.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::UploadRequest;
use crate::error::RelayResult;

/// Receives files that survived their quiet window and readiness probe
///
/// Errors returned here are contained by the dispatch layer; they are logged
/// with the file path and never affect other files.
#[async_trait]
pub trait FileReadyHandler: Send + Sync {
    async fn on_file_ready(
        &self,
        request: UploadRequest,
        cancel: CancellationToken,
    ) -> RelayResult<()>;
}
