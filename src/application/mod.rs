//! Application Layer
//!
//! Use cases that orchestrate the relay flow.
//! This layer:
//! - Depends on Domain layer (entities, value objects, ports)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Components
//!
//! - `ReadinessProber` - Bounded-retry exclusive-open check
//! - `DebounceCoordinator` - Per-path quiet-window coalescing
//! - `DispatchPipeline` - Watches, routing and delivery with failure containment
//! - `TransportHandler` - Delivery callback that uploads through the session manager

pub mod debounce;
pub mod dispatch;
pub mod readiness;
pub mod relay;

pub use debounce::{DebounceCoordinator, DEFAULT_QUIET_WINDOW};
pub use dispatch::{
    DispatchPipeline, Dispatcher, PipelineSettings, SkipReason, SkippedMapping, StartReport,
    WatchedFolder,
};
pub use readiness::{ReadinessProber, DEFAULT_PROBE_ATTEMPTS, DEFAULT_PROBE_DELAY};
pub use relay::TransportHandler;
