//! Configuration discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RelayError, RelayResult};

use super::types::Config;
use super::ConfigWarning;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "DROPRELAY_CONFIG";

/// Configuration file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "droprelay.toml";

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> RelayResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| RelayError::ConfigParse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Pick the configuration file to load
///
/// An explicit path or `DROPRELAY_CONFIG` must exist; otherwise the local
/// file and then the user config are tried in turn.
pub fn resolve_config_path(explicit: Option<&Path>, env: Option<String>) -> RelayResult<PathBuf> {
    if let Some(path) = explicit {
        return existing(path.to_path_buf());
    }
    if let Some(path) = env.filter(|p| !p.trim().is_empty()) {
        return existing(PathBuf::from(path));
    }

    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("droprelay").join("config.toml"));
    }

    candidates
        .iter()
        .find(|candidate| candidate.is_file())
        .cloned()
        .ok_or_else(|| RelayError::ConfigNotFound {
            searched: candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn existing(path: PathBuf) -> RelayResult<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(RelayError::ConfigNotFound {
            searched: path.display().to_string(),
        })
    }
}

/// Apply environment variable overrides (DROPRELAY_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |name| std::env::var(name).ok())
}

/// Apply overrides read through `lookup`
///
/// Empty values are ignored, as is a port that does not parse.
pub fn with_env_overrides_from<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    // DROPRELAY_ROOT
    if let Some(root) = var("DROPRELAY_ROOT") {
        config.monitor.root = Some(PathBuf::from(root));
    }

    // DROPRELAY_SFTP_*
    if let Some(host) = var("DROPRELAY_SFTP_HOST") {
        config.sftp.host = host;
    }
    if let Some(port) = var("DROPRELAY_SFTP_PORT").and_then(|p| p.trim().parse().ok()) {
        config.sftp.port = port;
    }
    if let Some(username) = var("DROPRELAY_SFTP_USERNAME") {
        config.sftp.username = username;
    }
    if let Some(password) = var("DROPRELAY_SFTP_PASSWORD") {
        config.sftp.password = Some(password);
    }
    if let Some(key_path) = var("DROPRELAY_SFTP_KEY_PATH") {
        config.sftp.ssh_key_path = Some(PathBuf::from(key_path));
    }

    // DROPRELAY_LOG
    if let Some(level) = var("DROPRELAY_LOG") {
        config.logging.level = Some(level);
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "monitor",
        "root",
        "quiet_window_ms",
        "folders",
        "readiness",
        "attempts",
        "delay_ms",
        "sftp",
        "host",
        "port",
        "username",
        "password",
        "ssh_key_path",
        "key_passphrase",
        "authentication_method",
        "connect_timeout_secs",
        "logging",
        "level",
        "format",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
