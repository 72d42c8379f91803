//! File-backed sessions across restarts and backend reboots.

use rideready_config::Settings;
use rideready_core::storage::SESSION_FILE;
use rideready_engine::{App, RecordingOpener};
use rideready_types::RunOverrides;
use serde_json::json;
use wiremock::MockServer;

use crate::common::{bike, mount_health, mount_images, mount_recommend};

fn settings(server: &MockServer, dir: &std::path::Path) -> Settings {
    Settings {
        base_url: server.uri(),
        session_dir: dir.join("session"),
        ..Settings::default()
    }
}

#[tokio::test]
async fn history_survives_restart_with_same_boot() {
    let server = MockServer::start().await;
    mount_health(&server, "boot-1").await;
    mount_images(&server, "https://img.example.com/bike.jpg").await;
    mount_recommend(&server, json!([bike("yamaha_r3", Some(true))])).await;

    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&server, dir.path());

    let mut first = App::from_settings(&settings, Box::new(RecordingOpener::new())).unwrap();
    first.startup().await;
    first.run_and_save(RunOverrides::default()).await.unwrap();
    drop(first);
    assert!(settings.session_dir.join(SESSION_FILE).exists());

    let mut second = App::from_settings(&settings, Box::new(RecordingOpener::new())).unwrap();
    second.startup().await;
    assert_eq!(second.timeline().len(), 1);
    assert_eq!(second.visible_items()[0].identity(), "yamaha_r3");
}

#[tokio::test]
async fn backend_reboot_discards_stored_session() {
    let dir = tempfile::tempdir().unwrap();

    let before = MockServer::start().await;
    mount_health(&before, "boot-1").await;
    mount_images(&before, "https://img.example.com/bike.jpg").await;
    mount_recommend(&before, json!([bike("yamaha_r3", Some(true))])).await;

    let mut app = App::from_settings(&settings(&before, dir.path()), Box::new(RecordingOpener::new())).unwrap();
    app.startup().await;
    app.run_and_save(RunOverrides::default()).await.unwrap();
    drop(app);

    let after = MockServer::start().await;
    mount_health(&after, "boot-2").await;

    let mut app = App::from_settings(&settings(&after, dir.path()), Box::new(RecordingOpener::new())).unwrap();
    assert_eq!(app.timeline().len(), 1);
    app.startup().await;
    assert!(app.timeline().is_empty());
}

#[tokio::test]
async fn unreachable_backend_keeps_session() {
    let dir = tempfile::tempdir().unwrap();

    let server = MockServer::builder().start().await;
    mount_health(&server, "boot-1").await;
    mount_images(&server, "https://img.example.com/bike.jpg").await;
    mount_recommend(&server, json!([bike("yamaha_r3", Some(true))])).await;
    let settings = settings(&server, dir.path());

    let mut app = App::from_settings(&settings, Box::new(RecordingOpener::new())).unwrap();
    app.startup().await;
    app.run_and_save(RunOverrides::default()).await.unwrap();
    drop(app);
    drop(server);

    let mut app = App::from_settings(&settings, Box::new(RecordingOpener::new())).unwrap();
    app.startup().await;
    assert!(app.health().is_none());
    assert_eq!(app.timeline().len(), 1);
    assert!(app.status().is_some_and(|s| s.starts_with("Health check failed")));
}
