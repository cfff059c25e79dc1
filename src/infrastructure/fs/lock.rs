//! Exclusive open
//!
//! A file is considered free when it can be opened for reading and an
//! exclusive lock can be taken on it without blocking. On Windows the handle
//! is also opened with no sharing, so any writer still holding the file
//! produces a sharing violation.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use fs2::FileExt;

/// Try once to open `path` exclusively; the handle is released on return.
pub fn try_open_exclusive(path: &Path) -> io::Result<()> {
    let file = open_unshared(path)?;
    FileExt::try_lock_exclusive(&file)?;
    // Lock is released when `file` drops
    Ok(())
}

#[cfg(windows)]
fn open_unshared(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    OpenOptions::new().read(true).share_mode(0).open(path)
}

#[cfg(not(windows))]
fn open_unshared(path: &Path) -> io::Result<File> {
    OpenOptions::new().read(true).open(path)
}
