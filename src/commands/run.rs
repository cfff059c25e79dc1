use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use droprelay::application::{DispatchPipeline, TransportHandler};
use droprelay::config::LoadedConfig;
use droprelay::domain::ports::Connector;
use droprelay::infrastructure::{SessionManager, SftpConnector};
use droprelay::logging;

/// How long shutdown waits for in-flight uploads
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub fn cmd_run(config: Option<&Path>, verbose: u8) -> Result<ExitCode> {
    let loaded = LoadedConfig::discover(config).context("failed to load configuration")?;

    let directive = logging::filter_directive(verbose, loaded.config.logging.level.as_deref());
    logging::init(&directive, loaded.config.logging.format)?;

    info!(config = %loaded.path.display(), "Loaded configuration");
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }

    loaded.config.validate()?;
    let settings = loaded.config.sftp_settings()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(relay(loaded, SftpConnector::new(settings)))
}

async fn relay(loaded: LoadedConfig, connector: SftpConnector) -> Result<ExitCode> {
    let shutdown = CancellationToken::new();
    let on_interrupt = shutdown.clone();
    ctrlc::set_handler(move || on_interrupt.cancel())
        .context("failed to install Ctrl+C handler")?;

    info!(endpoint = %connector.endpoint(), "Relaying to SFTP server");
    let sessions = Arc::new(SessionManager::new(connector));
    let handler = Arc::new(TransportHandler::new(Arc::clone(&sessions)));
    let pipeline = DispatchPipeline::new(&loaded.config.pipeline_settings(), handler);

    let root = loaded.monitor_root();
    let report = pipeline.start(&loaded.config.mappings(), &root, &shutdown)?;
    if report.watched.is_empty() {
        error!(root = %root.display(), "No folder mapping could be watched");
        pipeline.stop();
        return Ok(ExitCode::FAILURE);
    }

    info!(
        watched = report.watched.len(),
        skipped = report.skipped.len(),
        "Relay started; press Ctrl+C to stop"
    );

    shutdown.cancelled().await;
    info!("Shutting down");

    pipeline.stop();
    if tokio::time::timeout(DRAIN_TIMEOUT, pipeline.drain())
        .await
        .is_err()
    {
        warn!(
            timeout_secs = DRAIN_TIMEOUT.as_secs(),
            "In-flight uploads did not finish before the drain timeout"
        );
    }
    if !sessions.shutdown_within(DRAIN_TIMEOUT).await {
        warn!(
            timeout_secs = DRAIN_TIMEOUT.as_secs(),
            "SFTP session did not close before the drain timeout"
        );
    }

    info!("Stopped");
    Ok(ExitCode::SUCCESS)
}
