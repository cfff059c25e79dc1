//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod config_warning;
mod remote_path;
mod watch_key;

pub use config_warning::ConfigWarning;
pub use remote_path::{RemotePath, RemotePathError};
pub use watch_key::WatchKey;
