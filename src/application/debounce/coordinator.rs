//! Debounce coordinator implementation

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace, warn};

use crate::application::dispatch::Dispatcher;
use crate::domain::entities::UploadRequest;
use crate::domain::ports::{Readiness, ReadinessProbe};
use crate::domain::value_objects::WatchKey;

/// Default quiet window
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(750);

/// The current wait for one path
struct PendingWait {
    cancel: CancellationToken,
    remote_folder: String,
    generation: u64,
}

struct Inner {
    pending: DashMap<WatchKey, PendingWait>,
    next_generation: AtomicU64,
    quiet_window: Duration,
    probe: Arc<dyn ReadinessProbe>,
    dispatcher: Dispatcher,
    tasks: TaskTracker,
}

/// Owns the pending-wait map and the per-path settle tasks
///
/// Cheap to clone; clones share the same map.
#[derive(Clone)]
pub struct DebounceCoordinator {
    inner: Arc<Inner>,
}

impl DebounceCoordinator {
    pub fn new(
        quiet_window: Duration,
        probe: Arc<dyn ReadinessProbe>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: DashMap::new(),
                next_generation: AtomicU64::new(0),
                quiet_window,
                probe,
                dispatcher,
                tasks: TaskTracker::new(),
            }),
        }
    }

    /// Record a notification for `path` and (re)start its quiet window
    ///
    /// Any earlier wait for the same path is cancelled and can no longer
    /// dispatch. Must be called from within a tokio runtime.
    pub fn notify(&self, path: PathBuf, remote_folder: &str, shutdown: &CancellationToken) {
        let key = WatchKey::new(&path);
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancel = shutdown.child_token();

        let previous = self.inner.pending.insert(
            key.clone(),
            PendingWait {
                cancel: cancel.clone(),
                remote_folder: remote_folder.to_string(),
                generation,
            },
        );
        if let Some(previous) = previous {
            previous.cancel.cancel();
            trace!(path = %path.display(), "Superseded pending wait");
        }

        let inner = Arc::clone(&self.inner);
        let remote_folder = remote_folder.to_string();
        let shutdown = shutdown.clone();
        self.inner.tasks.spawn(async move {
            inner
                .settle(key, path, remote_folder, generation, cancel, shutdown)
                .await;
        });
    }

    /// Cancel every outstanding wait without waiting for the tasks to finish
    pub fn cancel_all(&self) {
        let mut cancelled = 0usize;
        self.inner.pending.retain(|_, wait| {
            wait.cancel.cancel();
            cancelled += 1;
            false
        });
        if cancelled > 0 {
            debug!(cancelled, "Cancelled pending waits");
        }
    }

    /// Number of paths currently inside their quiet window or probe
    pub fn pending_len(&self) -> usize {
        self.inner.pending.len()
    }

    /// Remote folder the current wait for `path` will deliver to, if any
    pub fn pending_remote_folder(&self, path: &Path) -> Option<String> {
        self.inner
            .pending
            .get(&WatchKey::new(path))
            .map(|wait| wait.remote_folder.clone())
    }

    /// Wait until every settle task (including in-flight deliveries) has finished
    ///
    /// Intended for shutdown after `cancel_all`; notifications issued while
    /// draining are still tracked.
    pub async fn drain(&self) {
        self.inner.tasks.close();
        self.inner.tasks.wait().await;
        self.inner.tasks.reopen();
    }
}

impl Inner {
    async fn settle(
        &self,
        key: WatchKey,
        path: PathBuf,
        remote_folder: String,
        generation: u64,
        cancel: CancellationToken,
        shutdown: CancellationToken,
    ) {
        let elapsed = tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.quiet_window) => true,
        };

        if !elapsed {
            self.release(&key, generation);
            return;
        }

        let readiness = self.probe.probe(&path, &cancel).await;
        self.release(&key, generation);

        match readiness {
            Readiness::Ready { attempts } => {
                debug!(path = %path.display(), attempts, "File is stable");
                self.dispatcher
                    .deliver(UploadRequest::new(path, remote_folder), shutdown)
                    .await;
            }
            Readiness::Exhausted { attempts } => warn!(
                path = %path.display(),
                attempts,
                "File still locked after readiness budget; dropping"
            ),
            Readiness::Missing => {
                debug!(path = %path.display(), "File disappeared before it settled")
            }
            Readiness::Cancelled => trace!(path = %path.display(), "Readiness probe cancelled"),
        }
    }

    /// Remove the entry only if it is still the wait installed as `generation`
    fn release(&self, key: &WatchKey, generation: u64) {
        self.pending
            .remove_if(key, |_, wait| wait.generation == generation);
    }
}
