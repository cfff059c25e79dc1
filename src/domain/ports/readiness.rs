//! Readiness Port
//!
//! Decides whether a writer has finished with a file.

use std::path::Path;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Outcome of a readiness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The file could be opened exclusively on the given attempt
    Ready { attempts: u32 },
    /// Every attempt in the budget hit a lock or transient error
    Exhausted { attempts: u32 },
    /// The file no longer exists (e.g. a temp file renamed away)
    Missing,
    /// Shutdown or a newer notification interrupted the probe
    Cancelled,
}

/// Bounded-retry check that nobody holds the file exclusively
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn probe(&self, path: &Path, cancel: &CancellationToken) -> Readiness;
}
