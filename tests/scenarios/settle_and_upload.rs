//! Scenario: Files dropped into a watched folder reach the remote side once
//!
//! Journey: A producer writes an export into `incoming/` in several bursts,
//! another producer writes a temp file and renames it into place.
//!
//! Success Criteria:
//! - Each finished file is uploaded exactly once, under its basename
//! - The temp name is never uploaded
//! - One session serves every upload

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use droprelay::application::{DispatchPipeline, PipelineSettings, TransportHandler};
use droprelay::domain::entities::FolderMapping;
use droprelay::infrastructure::SessionManager;

use crate::common::*;

fn settings() -> PipelineSettings {
    PipelineSettings {
        quiet_window: Duration::from_millis(300),
        probe_attempts: 10,
        probe_delay: Duration::from_millis(50),
    }
}

struct Relay {
    _root: tempfile::TempDir,
    incoming: std::path::PathBuf,
    store: Arc<RemoteStore>,
    pipeline: DispatchPipeline,
    shutdown: CancellationToken,
}

fn start_relay() -> Relay {
    let root = tempfile::tempdir().unwrap();
    let incoming = root.path().join("incoming");
    std::fs::create_dir(&incoming).unwrap();

    let store = Arc::new(RemoteStore::default());
    let sessions = Arc::new(SessionManager::new(MemoryConnector {
        store: Arc::clone(&store),
    }));
    let pipeline = DispatchPipeline::new(&settings(), Arc::new(TransportHandler::new(sessions)));
    let shutdown = CancellationToken::new();

    let report = pipeline
        .start(
            &[FolderMapping::new("incoming", "remote/dropzone")],
            root.path(),
            &shutdown,
        )
        .unwrap();
    assert_eq!(report.watched.len(), 1);

    Relay {
        _root: root,
        incoming,
        store,
        pipeline,
        shutdown,
    }
}

/// SCENARIO: A file written in bursts is uploaded once with its final content
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_burst_written_file_uploads_once() {
    use std::io::Write;

    let relay = start_relay();
    let path = relay.incoming.join("report.csv");

    let mut file = std::fs::File::create(&path).unwrap();
    for chunk in 0..4 {
        writeln!(file, "row {}", chunk).unwrap();
        file.flush().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    drop(file);

    let store = Arc::clone(&relay.store);
    assert!(
        wait_until(5_000, || !store.paths().is_empty()).await,
        "file was never uploaded"
    );

    // Give any stray duplicate a chance to show up
    tokio::time::sleep(Duration::from_millis(800)).await;

    let files = relay.store.files.lock().unwrap().clone();
    assert_eq!(files.len(), 1, "expected one upload, got {:?}", relay.store.paths());
    assert_eq!(files[0].0, "remote/dropzone/report.csv");
    assert_eq!(files[0].1, b"row 0\nrow 1\nrow 2\nrow 3\n".to_vec());
    assert_eq!(relay.store.connects(), 1);

    relay.pipeline.stop();
}

/// SCENARIO: Temp-file-then-rename producers upload only the final name
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_renamed_temp_file_uploads_final_name() {
    let relay = start_relay();
    let temp = relay.incoming.join("export.tmp");
    let done = relay.incoming.join("export.bin");

    std::fs::write(&temp, b"payload").unwrap();
    std::fs::rename(&temp, &done).unwrap();

    let store = Arc::clone(&relay.store);
    assert!(
        wait_until(5_000, || !store.paths().is_empty()).await,
        "renamed file was never uploaded"
    );
    tokio::time::sleep(Duration::from_millis(800)).await;

    assert_eq!(relay.store.paths(), vec!["remote/dropzone/export.bin".to_string()]);

    relay.pipeline.stop();
}

/// SCENARIO: Ctrl+C inside the quiet window means nothing is uploaded
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_shutdown_before_settling_uploads_nothing() {
    let relay = start_relay();

    std::fs::write(relay.incoming.join("late.bin"), b"late").unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    relay.shutdown.cancel();
    relay.pipeline.stop();
    relay.pipeline.drain().await;
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert!(relay.store.paths().is_empty());
    assert_eq!(relay.pipeline.coordinator().pending_len(), 0);
}
