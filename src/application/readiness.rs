//! Readiness Prober
//!
//! Handles both "write in place then rest" and "write temp file then rename"
//! producers without knowing which one created the file: it simply retries an
//! exclusive open until it succeeds or the budget runs out.

use std::io;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::domain::ports::{Readiness, ReadinessProbe};
use crate::infrastructure::fs::try_open_exclusive;

/// Default number of exclusive-open attempts
pub const DEFAULT_PROBE_ATTEMPTS: u32 = 10;

/// Default delay between attempts
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_millis(200);

/// Probes a file with up to `attempts` exclusive opens, `delay` apart
#[derive(Debug, Clone)]
pub struct ReadinessProber {
    attempts: u32,
    delay: Duration,
}

impl ReadinessProber {
    /// `attempts` is clamped to at least one
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Default for ReadinessProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_ATTEMPTS, DEFAULT_PROBE_DELAY)
    }
}

#[async_trait]
impl ReadinessProbe for ReadinessProber {
    async fn probe(&self, path: &Path, cancel: &CancellationToken) -> Readiness {
        for attempt in 1..=self.attempts {
            if cancel.is_cancelled() {
                return Readiness::Cancelled;
            }

            match try_open_exclusive(path) {
                Ok(()) => return Readiness::Ready { attempts: attempt },
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Readiness::Missing,
                Err(e) => trace!(
                    path = %path.display(),
                    attempt,
                    error = %e,
                    "File still held by a writer"
                ),
            }

            if attempt < self.attempts {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Readiness::Cancelled,
                    _ = tokio::time::sleep(self.delay) => {}
                }
            }
        }

        Readiness::Exhausted {
            attempts: self.attempts,
        }
    }
}
