//! Watch Key Value Object
//!
//! Identity of a watched file for coalescing purposes.

use std::fmt;
use std::path::Path;

/// Normalized, case-insensitive identity of a local file path
///
/// Two notifications for `C:\Drop\Report.CSV` and `c:/drop/report.csv`
/// map to the same key, so they coalesce into one pending wait.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchKey(String);

impl WatchKey {
    pub fn new(path: &Path) -> Self {
        let normalized = path.to_string_lossy().replace('\\', "/").to_lowercase();
        Self(normalized)
    }
}

impl fmt::Display for WatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
