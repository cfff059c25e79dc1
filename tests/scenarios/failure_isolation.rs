//! Scenario: One bad file does not disturb the others
//!
//! Journey: Several files land at once; the server rejects one of them.
//!
//! Success Criteria:
//! - Every other file is still uploaded
//! - Files dropped after the failure are still uploaded
//! - The callback sees each settled file exactly once

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use droprelay::application::{DispatchPipeline, PipelineSettings, TransportHandler};
use droprelay::domain::entities::FolderMapping;
use droprelay::infrastructure::SessionManager;

use crate::common::*;

fn settings() -> PipelineSettings {
    PipelineSettings {
        quiet_window: Duration::from_millis(250),
        probe_attempts: 5,
        probe_delay: Duration::from_millis(50),
    }
}

/// SCENARIO: A rejected upload leaves its neighbours and later files alone
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_rejected_file_is_isolated() {
    let root = tempfile::tempdir().unwrap();
    let incoming = root.path().join("incoming");
    std::fs::create_dir(&incoming).unwrap();

    let store = Arc::new(RemoteStore::default());
    let sessions = Arc::new(SessionManager::new(MemoryConnector {
        store: Arc::clone(&store),
    }));
    let pipeline = DispatchPipeline::new(&settings(), Arc::new(TransportHandler::new(sessions)));
    let shutdown = CancellationToken::new();
    pipeline
        .start(&[FolderMapping::new("incoming", "out")], root.path(), &shutdown)
        .unwrap();

    std::fs::write(incoming.join("a.bin"), b"a").unwrap();
    std::fs::write(incoming.join("reject-me.bin"), b"x").unwrap();
    std::fs::write(incoming.join("b.bin"), b"b").unwrap();

    let seen = Arc::clone(&store);
    assert!(wait_until(5_000, || seen.paths().len() >= 2).await);

    std::fs::write(incoming.join("c.bin"), b"c").unwrap();
    let seen = Arc::clone(&store);
    assert!(wait_until(5_000, || seen.paths().len() >= 3).await);

    let mut paths = store.paths();
    paths.sort();
    assert_eq!(paths, vec!["out/a.bin", "out/b.bin", "out/c.bin"]);

    pipeline.stop();
}

/// SCENARIO: Two watched folders route to their own remote folders
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scenario_each_mapping_routes_to_its_remote_folder() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("scans")).unwrap();
    std::fs::create_dir(root.path().join("invoices")).unwrap();

    let recorder = Arc::new(Recorder::default());
    let pipeline = DispatchPipeline::new(&settings(), recorder.clone());
    let report = pipeline
        .start(
            &[
                FolderMapping::new("scans", "archive/scans"),
                FolderMapping::new("invoices", "finance/in"),
                FolderMapping::new("missing", "nowhere"),
            ],
            root.path(),
            &CancellationToken::new(),
        )
        .unwrap();
    assert_eq!(report.watched.len(), 2);
    assert_eq!(report.skipped.len(), 1);

    std::fs::write(root.path().join("scans/page1.pdf"), b"scan").unwrap();
    std::fs::write(root.path().join("invoices/inv-7.pdf"), b"invoice").unwrap();

    let seen = Arc::clone(&recorder);
    assert!(wait_until(5_000, || seen.requests().len() >= 2).await);
    tokio::time::sleep(Duration::from_millis(600)).await;

    let mut routed: Vec<(String, String)> = recorder
        .requests()
        .iter()
        .map(|r| {
            (
                r.local_path().file_name().unwrap().to_string_lossy().into_owned(),
                r.remote_folder().to_string(),
            )
        })
        .collect();
    routed.sort();
    assert_eq!(
        routed,
        vec![
            ("inv-7.pdf".to_string(), "finance/in".to_string()),
            ("page1.pdf".to_string(), "archive/scans".to_string()),
        ]
    );

    pipeline.stop();
}
