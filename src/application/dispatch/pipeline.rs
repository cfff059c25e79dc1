//! Dispatch pipeline lifecycle

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::debounce::{DebounceCoordinator, DEFAULT_QUIET_WINDOW};
use crate::application::readiness::{
    ReadinessProber, DEFAULT_PROBE_ATTEMPTS, DEFAULT_PROBE_DELAY,
};
use crate::domain::entities::{FolderMapping, MappingError};
use crate::domain::ports::{FileReadyHandler, ReadinessProbe};
use crate::error::{RelayError, RelayResult};
use crate::infrastructure::watch::{FolderWatch, RawEvent};

use super::Dispatcher;

/// Timing knobs for the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub quiet_window: Duration,
    pub probe_attempts: u32,
    pub probe_delay: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            quiet_window: DEFAULT_QUIET_WINDOW,
            probe_attempts: DEFAULT_PROBE_ATTEMPTS,
            probe_delay: DEFAULT_PROBE_DELAY,
        }
    }
}

/// A mapping that is now being watched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFolder {
    pub local_dir: PathBuf,
    pub remote_folder: String,
}

/// Why a mapping was not watched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Invalid(MappingError),
    MissingDirectory(PathBuf),
    WatchFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Invalid(e) => write!(f, "invalid mapping: {}", e),
            SkipReason::MissingDirectory(dir) => {
                write!(f, "local folder does not exist: {}", dir.display())
            }
            SkipReason::WatchFailed(message) => write!(f, "watch failed: {}", message),
        }
    }
}

/// A mapping left out of the running pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMapping {
    pub mapping: FolderMapping,
    pub reason: SkipReason,
}

/// Outcome of `DispatchPipeline::start`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartReport {
    pub watched: Vec<WatchedFolder>,
    pub skipped: Vec<SkippedMapping>,
}

struct Running {
    watches: Vec<FolderWatch>,
    pump: CancellationToken,
}

/// Start/stop lifecycle around the debounce coordinator
pub struct DispatchPipeline {
    coordinator: DebounceCoordinator,
    running: Mutex<Option<Running>>,
}

impl DispatchPipeline {
    /// Pipeline probing files with the default exclusive-open prober
    pub fn new(settings: &PipelineSettings, handler: Arc<dyn FileReadyHandler>) -> Self {
        let prober = ReadinessProber::new(settings.probe_attempts, settings.probe_delay);
        Self::with_probe(settings.quiet_window, Arc::new(prober), handler)
    }

    pub fn with_probe(
        quiet_window: Duration,
        probe: Arc<dyn ReadinessProbe>,
        handler: Arc<dyn FileReadyHandler>,
    ) -> Self {
        let coordinator = DebounceCoordinator::new(quiet_window, probe, Dispatcher::new(handler));
        Self {
            coordinator,
            running: Mutex::new(None),
        }
    }

    pub fn coordinator(&self) -> &DebounceCoordinator {
        &self.coordinator
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Watch every usable mapping under `root`
    ///
    /// Blank mappings, missing directories and watch registration failures
    /// are logged and reported in `StartReport::skipped`; they never stop the
    /// other mappings. Must be called from within a tokio runtime.
    pub fn start(
        &self,
        mappings: &[FolderMapping],
        root: &Path,
        cancel: &CancellationToken,
    ) -> RelayResult<StartReport> {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if running.is_some() {
            return Err(RelayError::AlreadyStarted);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let mut report = StartReport::default();
        let mut watches = Vec::new();

        for mapping in mappings {
            if let Err(e) = mapping.validate() {
                warn!(
                    local = mapping.local_subpath(),
                    remote = mapping.remote_folder(),
                    "Invalid folder mapping: {}",
                    e
                );
                report.skipped.push(SkippedMapping {
                    mapping: mapping.clone(),
                    reason: SkipReason::Invalid(e),
                });
                continue;
            }

            let local_dir = mapping.resolve(root);
            if !local_dir.is_dir() {
                warn!(local_dir = %local_dir.display(), "Local folder does not exist");
                report.skipped.push(SkippedMapping {
                    mapping: mapping.clone(),
                    reason: SkipReason::MissingDirectory(local_dir),
                });
                continue;
            }

            match FolderWatch::spawn(&local_dir, mapping.remote_folder(), tx.clone()) {
                Ok(watch) => {
                    info!(
                        local_dir = %local_dir.display(),
                        remote_folder = mapping.remote_folder(),
                        "Monitoring"
                    );
                    watches.push(watch);
                    report.watched.push(WatchedFolder {
                        local_dir,
                        remote_folder: mapping.remote_folder().to_string(),
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Skipping folder mapping");
                    report.skipped.push(SkippedMapping {
                        mapping: mapping.clone(),
                        reason: SkipReason::WatchFailed(e.to_string()),
                    });
                }
            }
        }
        // Watches hold the only senders from here on
        drop(tx);

        let pump = cancel.child_token();
        tokio::spawn(pump_events(
            rx,
            self.coordinator.clone(),
            cancel.clone(),
            pump.clone(),
        ));

        *running = Some(Running { watches, pump });
        Ok(report)
    }

    /// Feed one raw notification to the coordinator
    ///
    /// This is what the watch pump does for every event; exposed for other
    /// notification sources.
    pub fn notify(&self, path: PathBuf, remote_folder: &str, cancel: &CancellationToken) {
        self.coordinator.notify(path, remote_folder, cancel);
    }

    /// Dispose all watches and cancel every pending wait
    ///
    /// Does not wait for in-flight settle tasks; use `drain` for that.
    pub fn stop(&self) {
        let stopped = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(Running { watches, pump }) = stopped {
            pump.cancel();
            let count = watches.len();
            drop(watches);
            info!(watches = count, "Stopped monitoring");
        }
        self.coordinator.cancel_all();
    }

    /// Wait for in-flight settle and delivery tasks to finish
    pub async fn drain(&self) {
        self.coordinator.drain().await;
    }
}

impl Drop for DispatchPipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn pump_events(
    mut rx: UnboundedReceiver<RawEvent>,
    coordinator: DebounceCoordinator,
    shutdown: CancellationToken,
    stop: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            event = rx.recv() => match event {
                Some(RawEvent { path, remote_folder }) => {
                    coordinator.notify(path, &remote_folder, &shutdown);
                }
                None => break,
            },
        }
    }
    debug!("Event pump finished");
}
