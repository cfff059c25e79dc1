//! droprelay - drop-folder watcher that relays settled files over SFTP
//!
//! Files written into the configured local folders are debounced per path,
//! probed until their writer has released them, and uploaded through a
//! single shared SFTP session.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

// Re-exports for convenience
pub use application::{DispatchPipeline, PipelineSettings, StartReport, TransportHandler};
pub use config::{Config, ConfigWarning, LoadedConfig};
pub use domain::entities::{FolderMapping, UploadRequest};
pub use domain::ports::{FileReadyHandler, Readiness, ReadinessProbe};
pub use error::{RelayError, RelayResult};
pub use infrastructure::{SessionManager, SftpConnector};
