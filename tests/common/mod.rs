//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rideready_client::ApiClient;
use rideready_core::{MemoryStorage, Session};
use rideready_engine::{App, RecordingOpener};
use rideready_types::CuratedLists;
use rideready_types::ui::UiOptions;

/// An app talking to `server` with in-memory session storage.
pub fn app(server: &MockServer) -> (App, RecordingOpener) {
    let client = ApiClient::new(&server.uri(), Duration::from_secs(5), Duration::from_secs(2))
        .expect("mock server uri is valid");
    let session = Session::new(Box::new(MemoryStorage::new()), 10);
    let opener = RecordingOpener::new();
    let app = App::new(
        client,
        session,
        CuratedLists::default(),
        UiOptions::default(),
        Box::new(opener.clone()),
    );
    (app, opener)
}

pub fn bike(id: &str, abs: Option<bool>) -> Value {
    json!({
        "id": id,
        "name": id.replace('_', " "),
        "category": "standard",
        "abs": abs,
        "seat_height_mm": 785,
        "wet_weight_kg": 168,
        "msrp_usd": 5899,
        "official_url": format!("https://example.com/{id}"),
        "reasons": [format!("{id} is light"), "Low seat"],
    })
}

pub async fn mount_health(server: &MockServer, boot_id: &str) {
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "offline_mode": false,
            "keys_present": {},
            "whitelist": { "bikes": 42, "gear": 7 },
            "boot_id": boot_id,
        })))
        .mount(server)
        .await;
}

pub async fn mount_recommend(server: &MockServer, items: Value) {
    Mock::given(method("POST"))
        .and(path("/api/recommend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

pub async fn mount_images(server: &MockServer, url: &str) {
    Mock::given(method("POST"))
        .and(path("/api/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "source": "mock",
            "images": [{ "url": url }],
        })))
        .mount(server)
        .await;
}

pub async fn mount_chat(server: &MockServer, plan: Value) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan))
        .mount(server)
        .await;
}

pub fn press(app: &mut App, code: KeyCode) -> bool {
    rideready_tui::apply_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

pub fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

/// Tick the app the way the frame loop does until background work settles.
pub async fn settle(app: &mut App) {
    for _ in 0..300 {
        app.tick();
        if !app.is_running() && !app.chat_busy() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("app did not settle");
}

/// Render one frame and return the screen as text, one row per line.
pub fn render(app: &App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test backend");
    terminal
        .draw(|frame| rideready_tui::draw(frame, app))
        .expect("draw");
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
