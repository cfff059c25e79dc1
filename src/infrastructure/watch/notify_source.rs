//! `notify`-backed folder watch

use std::path::{Path, PathBuf};

use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::error::{RelayError, RelayResult};

/// A raw notification for one path, tagged with its mapping's remote folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub path: PathBuf,
    pub remote_folder: String,
}

/// A live, non-recursive watch on one local directory
///
/// Dropping the value unregisters the watch; no events are sent afterwards.
pub struct FolderWatch {
    dir: PathBuf,
    _watcher: RecommendedWatcher,
}

impl FolderWatch {
    /// Watch `dir`, sending create/change/rename events for files to `tx`
    pub fn spawn(
        dir: &Path,
        remote_folder: &str,
        tx: UnboundedSender<RawEvent>,
    ) -> RelayResult<Self> {
        let remote_folder = remote_folder.to_string();
        let watched = dir.to_path_buf();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    for path in relevant_paths(&event) {
                        // Receiver gone means the pipeline stopped
                        let _ = tx.send(RawEvent {
                            path,
                            remote_folder: remote_folder.clone(),
                        });
                    }
                }
                Err(e) => warn!(dir = %watched.display(), error = %e, "Watch error"),
            }
        })
        .map_err(|e| RelayError::Watch {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| RelayError::Watch {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            _watcher: watcher,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl std::fmt::Debug for FolderWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderWatch").field("dir", &self.dir).finish()
    }
}

/// Paths of an event that should be offered to the debounce coordinator
///
/// Creates, content changes and rename destinations qualify. Rename sources,
/// metadata-only changes, removals and directories do not.
pub fn relevant_paths(event: &Event) -> Vec<PathBuf> {
    let candidates: Vec<&PathBuf> = match event.kind {
        EventKind::Create(CreateKind::File | CreateKind::Any | CreateKind::Other) => {
            event.paths.iter().collect()
        }
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => event.paths.iter().collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.iter().collect(),
        // [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.last().into_iter().collect()
        }
        // Backends that cannot tell source from destination; keep what still exists
        EventKind::Modify(ModifyKind::Name(RenameMode::Any | RenameMode::Other)) => {
            event.paths.iter().filter(|p| p.is_file()).collect()
        }
        _ => Vec::new(),
    };

    candidates
        .into_iter()
        .filter(|p| !p.is_dir())
        .cloned()
        .collect()
}
