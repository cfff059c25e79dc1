//! Tracing subscriber setup for the binary

use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;
use crate::error::{RelayError, RelayResult};

/// Level used when neither `-v` nor the configuration says otherwise
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Filter directive for the given `-v` count
///
/// Without `-v` the configured level (or `DROPRELAY_LOG`, already folded into
/// it) wins.
pub fn filter_directive(verbose: u8, configured: Option<&str>) -> String {
    match verbose {
        0 => configured
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(DEFAULT_DIRECTIVE)
            .to_string(),
        1 => "info,droprelay=debug".to_string(),
        2 => "info,droprelay=trace".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber writing to stderr
///
/// ANSI colours are only used for the pretty format on a terminal.
pub fn init(directive: &str, format: LogFormat) -> RelayResult<()> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| RelayError::Logging(format!("invalid filter '{}': {}", directive, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Pretty => builder
            .with_ansi(std::io::stderr().is_terminal())
            .try_init(),
        LogFormat::Json => builder.json().with_ansi(false).try_init(),
    };

    installed.map_err(|e| RelayError::Logging(e.to_string()))
}
