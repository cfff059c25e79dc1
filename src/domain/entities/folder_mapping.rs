//! FolderMapping entity - one watched local folder and its remote destination

use std::fmt;
use std::path::{Path, PathBuf};

/// Why a mapping cannot be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingError {
    /// Local subpath is empty or whitespace
    EmptyLocal,
    /// Remote folder is empty or whitespace
    EmptyRemote,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::EmptyLocal => write!(f, "local folder is empty"),
            MappingError::EmptyRemote => write!(f, "remote folder is empty"),
        }
    }
}

impl std::error::Error for MappingError {}

/// A local subpath (relative to the monitor root) relayed to a remote folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderMapping {
    local_subpath: String,
    remote_folder: String,
}

impl FolderMapping {
    pub fn new(local_subpath: impl Into<String>, remote_folder: impl Into<String>) -> Self {
        Self {
            local_subpath: local_subpath.into(),
            remote_folder: remote_folder.into(),
        }
    }

    pub fn local_subpath(&self) -> &str {
        &self.local_subpath
    }

    pub fn remote_folder(&self) -> &str {
        &self.remote_folder
    }

    /// Both sides must be non-blank
    pub fn validate(&self) -> Result<(), MappingError> {
        if self.local_subpath.trim().is_empty() {
            return Err(MappingError::EmptyLocal);
        }
        if self.remote_folder.trim().is_empty() {
            return Err(MappingError::EmptyRemote);
        }
        Ok(())
    }

    /// Resolve the watched directory under `root`
    ///
    /// A leading separator on the subpath is ignored so that `"/incoming"`
    /// stays under the root instead of replacing it.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let relative = self.local_subpath.trim_start_matches(['/', '\\']);
        root.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_blank_fields() {
        assert_eq!(
            FolderMapping::new("  ", "remote").validate(),
            Err(MappingError::EmptyLocal)
        );
        assert_eq!(
            FolderMapping::new("incoming", "").validate(),
            Err(MappingError::EmptyRemote)
        );
        assert!(FolderMapping::new("incoming", "remote/dropzone")
            .validate()
            .is_ok());
    }

    #[test]
    fn resolve_joins_under_root() {
        let mapping = FolderMapping::new("incoming", "remote/dropzone");
        assert_eq!(
            mapping.resolve(Path::new("/data")),
            PathBuf::from("/data/incoming")
        );
    }

    #[test]
    fn resolve_keeps_leading_slash_subpath_under_root() {
        let mapping = FolderMapping::new("/incoming", "remote");
        assert_eq!(
            mapping.resolve(Path::new("/data")),
            PathBuf::from("/data/incoming")
        );
    }
}
