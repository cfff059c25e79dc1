//! Debounce Coordinator
//!
//! Turns a burst of raw notifications for one path into at most one
//! readiness check and one dispatch:
//! - One pending wait per normalized path, replaced atomically on every
//!   notification (last-write-wins for the remote folder)
//! - A fixed quiet window (750 ms default) before the readiness probe
//! - Generation-guarded cleanup so a stale wait never removes a newer one

mod coordinator;


pub use coordinator::{DebounceCoordinator, DEFAULT_QUIET_WINDOW};
