//! UploadRequest entity - a stabilized file ready for delivery

use std::path::{Path, PathBuf};

/// A file that passed its quiet window and readiness probe
///
/// Consumed once by the delivery callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    local_path: PathBuf,
    remote_folder: String,
}

impl UploadRequest {
    pub fn new(local_path: impl Into<PathBuf>, remote_folder: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            remote_folder: remote_folder.into(),
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn remote_folder(&self) -> &str {
        &self.remote_folder
    }
}
