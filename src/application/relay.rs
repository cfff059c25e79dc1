//! Upload relay
//!
//! The production delivery callback: every stabilized file is handed to the
//! shared `SessionManager`, which connects lazily and serializes transfers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::UploadRequest;
use crate::domain::ports::{Connector, FileReadyHandler};
use crate::error::RelayResult;
use crate::infrastructure::transport::SessionManager;

/// Bridges dispatch to the transport session manager
pub struct TransportHandler<C: Connector> {
    sessions: Arc<SessionManager<C>>,
}

impl<C: Connector> TransportHandler<C> {
    pub fn new(sessions: Arc<SessionManager<C>>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl<C: Connector + 'static> FileReadyHandler for TransportHandler<C> {
    async fn on_file_ready(
        &self,
        request: UploadRequest,
        cancel: CancellationToken,
    ) -> RelayResult<()> {
        self.sessions
            .upload(request.local_path(), request.remote_folder(), &cancel)
            .await?;
        Ok(())
    }
}
