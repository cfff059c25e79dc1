//! Remote Path Value Object
//!
//! The destination of an upload: `remote_folder + "/" + basename(local)`,
//! always forward-slash separated. The remote folder may be written with
//! either separator style. The local basename follows the host's rules: on
//! Windows both `/` and `\` end a segment, elsewhere only `/` does, since
//! `\` is a legal file name character there.

use std::fmt;
use std::path::Path;

/// Error when a remote target cannot be derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemotePathError {
    /// Remote folder is empty
    EmptyFolder,
    /// Local path has no file name component
    NoFileName(String),
}

impl fmt::Display for RemotePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemotePathError::EmptyFolder => write!(f, "remote folder is empty"),
            RemotePathError::NoFileName(path) => {
                write!(f, "local path '{}' has no file name", path)
            }
        }
    }
}

impl std::error::Error for RemotePathError {}

/// Forward-slash remote file path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath(String);

impl RemotePath {
    /// Build the upload target for `local_path` inside `remote_folder`
    pub fn for_upload(remote_folder: &str, local_path: &Path) -> Result<Self, RemotePathError> {
        let local = local_path.to_string_lossy();
        let file_name = basename(&local)
            .ok_or_else(|| RemotePathError::NoFileName(local.to_string()))?;

        let folder = remote_folder.trim().replace('\\', "/");
        if folder.is_empty() {
            return Err(RemotePathError::EmptyFolder);
        }

        let trimmed = folder.trim_end_matches('/');
        Ok(Self(format!("{}/{}", trimmed, file_name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(windows)]
const LOCAL_SEPARATORS: &[char] = &['/', '\\'];
#[cfg(not(windows))]
const LOCAL_SEPARATORS: &[char] = &['/'];

/// Last segment of a local path
fn basename(path: &str) -> Option<&str> {
    path.rsplit(LOCAL_SEPARATORS)
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}
