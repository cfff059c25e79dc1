//! Test environment builder for isolated droprelay CLI runs.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running a droprelay CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Environment variables the binary reads; cleared for every run
const DROPRELAY_VARS: &[&str] = &[
    "DROPRELAY_CONFIG",
    "DROPRELAY_ROOT",
    "DROPRELAY_SFTP_HOST",
    "DROPRELAY_SFTP_PORT",
    "DROPRELAY_SFTP_USERNAME",
    "DROPRELAY_SFTP_PASSWORD",
    "DROPRELAY_SFTP_KEY_PATH",
    "DROPRELAY_LOG",
];

/// Isolated working directory holding `droprelay.toml` and the drop folders
pub struct TestEnv {
    pub root: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_droprelay")),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let dir = self.path(relative);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.path("droprelay.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Run in the environment's directory with no DROPRELAY_* variables set
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], vars: &[(&str, &Path)]) -> TestResult {
        let mut command = Command::new(&self.bin);
        command.current_dir(self.root.path()).args(args);
        for var in DROPRELAY_VARS {
            command.env_remove(var);
        }
        // Keep the user config lookup inside the sandbox
        command
            .env("HOME", self.root.path())
            .env("XDG_CONFIG_HOME", self.path(".config"));
        for (name, value) in vars {
            command.env(name, value);
        }

        let output = command.output().unwrap();
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// A complete configuration watching `incoming` with password auth
pub const VALID_CONFIG: &str = r#"
[monitor]
quiet_window_ms = 750

[monitor.folders]
incoming = "remote/dropzone"

[sftp]
host = "sftp.example.com"
username = "relay"
password = "hunter2"
"#;
