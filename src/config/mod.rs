//! Configuration module for droprelay
//!
//! Configuration hierarchy:
//! 1. `--config` flag
//! 2. `DROPRELAY_CONFIG` environment variable
//! 3. `./droprelay.toml`
//! 4. User config (`<config dir>/droprelay/config.toml`)
//!
//! Individual values can then be overridden with `DROPRELAY_*` variables.

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{resolve_config_path, with_env_overrides_from, CONFIG_ENV, LOCAL_CONFIG_FILE};
pub use types::{
    AuthMethod, Config, LoadedConfig, LogFormat, LoggingConfig, MonitorConfig, ReadinessConfig,
    SftpConfig,
};
