//! Configuration type definitions

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::PipelineSettings;
use crate::domain::entities::FolderMapping;
use crate::error::{RelayError, RelayResult};
use crate::infrastructure::transport::{SftpCredentials, SftpSettings};

use super::loader;
use super::ConfigWarning;

/// Watched folders and debounce timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Base directory for the local subpaths; defaults to the config file's directory
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default = "default_quiet_window_ms")]
    pub quiet_window_ms: u64,

    /// Local subpath -> remote folder
    #[serde(default)]
    pub folders: BTreeMap<String, String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            root: None,
            quiet_window_ms: default_quiet_window_ms(),
            folders: BTreeMap::new(),
        }
    }
}

fn default_quiet_window_ms() -> u64 {
    750
}

/// Exclusive-open retry budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_attempts() -> u32 {
    10
}

fn default_delay_ms() -> u64 {
    200
}

/// How to authenticate against the SFTP server
///
/// Parsed case-insensitively (`"PrivateKey"`, `"privatekey"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    Password,
    PrivateKey,
}

impl TryFrom<String> for AuthMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "password" => Ok(AuthMethod::Password),
            "privatekey" | "private_key" | "private-key" => Ok(AuthMethod::PrivateKey),
            other => Err(format!(
                "unknown authentication method '{}' (expected 'password' or 'privatekey')",
                other
            )),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Password => f.write_str("password"),
            AuthMethod::PrivateKey => f.write_str("privatekey"),
        }
    }
}

/// Remote server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SftpConfig {
    #[serde(default)]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub ssh_key_path: Option<PathBuf>,

    #[serde(default)]
    pub key_passphrase: Option<String>,

    #[serde(default)]
    pub authentication_method: AuthMethod,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for SftpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            username: String::new(),
            password: None,
            ssh_key_path: None,
            key_passphrase: None,
            authentication_method: AuthMethod::default(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_port() -> u16 {
    22
}

fn default_connect_timeout_secs() -> u64 {
    30
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"info"` or `"droprelay=debug"`
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub format: LogFormat,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub readiness: ReadinessConfig,

    #[serde(default)]
    pub sftp: SftpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> RelayResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> RelayResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (DROPRELAY_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Check every setting the relay needs before it starts
    ///
    /// All problems are reported together, separated by `"; "`.
    pub fn validate(&self) -> RelayResult<()> {
        let mut problems = Vec::new();
        let sftp = &self.sftp;

        if sftp.host.trim().is_empty() {
            problems.push("sftp.host is required".to_string());
        }
        if sftp.port == 0 {
            problems.push("sftp.port must be between 1 and 65535".to_string());
        }
        if sftp.username.trim().is_empty() {
            problems.push("sftp.username is required".to_string());
        }
        match sftp.authentication_method {
            AuthMethod::Password => {
                if sftp.password.as_deref().map_or(true, str::is_empty) {
                    problems.push("sftp.password is required for password authentication".into());
                }
            }
            AuthMethod::PrivateKey => match &sftp.ssh_key_path {
                None => problems
                    .push("sftp.ssh_key_path is required for privatekey authentication".into()),
                Some(path) if !path.exists() => problems.push(format!(
                    "sftp.ssh_key_path does not exist: {}",
                    path.display()
                )),
                Some(_) => {}
            },
        }
        if sftp.connect_timeout_secs == 0 {
            problems.push("sftp.connect_timeout_secs must be greater than zero".to_string());
        }

        if self.monitor.folders.is_empty() {
            problems.push("monitor.folders must contain at least one mapping".to_string());
        }
        if self.monitor.quiet_window_ms == 0 {
            problems.push("monitor.quiet_window_ms must be greater than zero".to_string());
        }
        if self.readiness.attempts == 0 {
            problems.push("readiness.attempts must be at least 1".to_string());
        }
        if self.readiness.delay_ms == 0 {
            problems.push("readiness.delay_ms must be greater than zero".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(RelayError::InvalidConfig(problems.join("; ")))
        }
    }

    /// Folder mappings in key order
    pub fn mappings(&self) -> Vec<FolderMapping> {
        self.monitor
            .folders
            .iter()
            .map(|(local, remote)| FolderMapping::new(local.as_str(), remote.as_str()))
            .collect()
    }

    /// Monitor root, resolved against `base` when missing or relative
    pub fn monitor_root(&self, base: &Path) -> PathBuf {
        match &self.monitor.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            quiet_window: Duration::from_millis(self.monitor.quiet_window_ms),
            probe_attempts: self.readiness.attempts,
            probe_delay: Duration::from_millis(self.readiness.delay_ms),
        }
    }

    /// Connection settings for the SFTP connector; call after `validate`
    pub fn sftp_settings(&self) -> RelayResult<SftpSettings> {
        let sftp = &self.sftp;
        let credentials = match sftp.authentication_method {
            AuthMethod::Password => SftpCredentials::Password(
                sftp.password
                    .clone()
                    .ok_or_else(|| RelayError::InvalidConfig("sftp.password is required".into()))?,
            ),
            AuthMethod::PrivateKey => SftpCredentials::PrivateKey {
                path: sftp.ssh_key_path.clone().ok_or_else(|| {
                    RelayError::InvalidConfig("sftp.ssh_key_path is required".into())
                })?,
                passphrase: sftp.key_passphrase.clone().filter(|p| !p.is_empty()),
            },
        };

        Ok(SftpSettings {
            host: sftp.host.trim().to_string(),
            port: sftp.port,
            username: sftp.username.trim().to_string(),
            credentials,
            connect_timeout: Duration::from_secs(sftp.connect_timeout_secs),
        })
    }
}

/// A configuration together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    pub warnings: Vec<ConfigWarning>,
}

impl LoadedConfig {
    /// Resolve, load and apply environment overrides
    pub fn discover(explicit: Option<&Path>) -> RelayResult<Self> {
        let path = loader::resolve_config_path(explicit, std::env::var(loader::CONFIG_ENV).ok())?;
        let (config, warnings) = loader::load_with_warnings(&path)?;
        Ok(Self {
            config: config.with_env_overrides(),
            path,
            warnings,
        })
    }

    /// Directory holding the configuration file
    pub fn base_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    pub fn monitor_root(&self) -> PathBuf {
        self.config.monitor_root(&self.base_dir())
    }
}
