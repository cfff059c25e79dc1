//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Exclusive-open probing of local files
//! - `watch/` - `notify` watches feeding raw events into the relay
//! - `transport/` - Session manager and the SFTP connector

pub mod fs;
pub mod transport;
pub mod watch;

// Re-export for convenience
pub use fs::try_open_exclusive;
pub use transport::{SessionManager, SessionStatus, SftpConnector, SftpCredentials, SftpSettings};
pub use watch::{FolderWatch, RawEvent};
