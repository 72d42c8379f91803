//! Config file to running app.

use std::fs;

use rideready_config::{ENV_BASE_URL, RideReadyConfig, Settings};
use rideready_engine::{App, RecordingOpener};
use rideready_types::RunOverrides;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{bike, mount_images};

#[tokio::test]
async fn curated_override_pins_first_run() {
    let server = MockServer::start().await;
    mount_images(&server, "https://img.example.com/bike.jpg").await;
    Mock::given(method("POST"))
        .and(path("/api/recommend"))
        .and(body_partial_json(json!({ "pin_ids": ["bmw_g310r"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [bike("yamaha_r3", Some(true)), bike("bmw_g310r", Some(true))]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[server]
base_url = "http://ignored.invalid"
timeout_secs = 3

[session]
dir = "{}"
history_cap = 4

[app]
ascii_only = true

[curated]
global = ["bmw_g310r"]
"#,
            dir.path().join("session").display()
        ),
    )
    .unwrap();

    let config = RideReadyConfig::load_from(&config_path).unwrap();
    let uri = server.uri();
    let settings = Settings::resolve_with(Some(&config), |name| {
        (name == ENV_BASE_URL).then(|| uri.clone())
    });
    assert_eq!(settings.base_url, server.uri());
    assert_eq!(settings.history_cap, 4);
    assert!(settings.ui.ascii_only);

    let mut app = App::from_settings(&settings, Box::new(RecordingOpener::new())).unwrap();
    assert!(app.options().ascii_only);
    app.run_and_save(RunOverrides::default()).await.unwrap();
    assert_eq!(app.visible_items()[0].identity(), "bmw_g310r");
}

#[test]
fn malformed_config_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[server\nbase_url = 1").unwrap();

    let err = RideReadyConfig::load_from(&config_path).unwrap_err();
    assert_eq!(err.path(), config_path.as_path());
}
