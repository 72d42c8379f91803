//! Rendering and key-binding tests against ratatui's `TestBackend`.

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use rideready_client::ApiClient;
use rideready_core::{MemoryStorage, Session};
use rideready_engine::{App, RecordingOpener};
use rideready_types::CuratedLists;
use rideready_types::ui::{Focus, FormField, ListMode, Modal, UiOptions, View};

use crate::{apply_event, draw};

fn app_with(options: UiOptions) -> (App, RecordingOpener) {
    // Port 9 (discard): nothing here performs network IO.
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1), Duration::from_secs(1))
        .expect("static URL is valid");
    let session = Session::new(Box::new(MemoryStorage::new()), 10);
    let opener = RecordingOpener::new();
    let app = App::new(
        client,
        session,
        CuratedLists::default(),
        options,
        Box::new(opener.clone()),
    );
    (app, opener)
}

fn app() -> App {
    app_with(UiOptions::default()).0
}

fn render(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test backend");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
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

fn press(app: &mut App, code: KeyCode) -> bool {
    apply_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

#[test]
fn home_view_renders_tabs_and_status() {
    let screen = render(&app(), 100, 24);
    assert!(screen.contains("1 Home"));
    assert!(screen.contains("3 Recommendations"));
    assert!(screen.contains("Find a first motorcycle"));
    assert!(screen.contains("unreachable"));
}

#[test]
fn advisor_form_lists_every_field() {
    let mut app = app();
    app.navigate(View::Advisor);
    let screen = render(&app, 120, 30);
    for field in FormField::ALL {
        assert!(screen.contains(field.label()), "missing {}", field.label());
    }
    assert!(screen.contains("$6,000"));
    assert!(screen.contains("170 cm"));
}

#[test]
fn empty_recommendations_show_empty_message() {
    let mut app = app();
    app.navigate(View::Recommendations);
    let screen = render(&app, 120, 30);
    assert!(screen.contains("Ask the advisor"));
    assert!(screen.contains("No recommendations yet"));
}

#[test]
fn outbound_modal_is_drawn_over_the_view() {
    let mut app = app();
    app.request_open_link("https://www.honda.com/rebel");
    let screen = render(&app, 100, 24);
    assert!(screen.contains("Leaving RideReady"));
    assert!(screen.contains("y: open link"));
}

#[test]
fn ascii_mode_uses_ascii_chips() {
    let options = UiOptions {
        ascii_only: true,
        ..UiOptions::default()
    };
    let (mut app, _) = app_with(options);
    app.navigate(View::Advisor);
    let screen = render(&app, 140, 30);
    let chip = crate::glyphs(options).chip_off;
    assert!(chip.is_ascii());
    assert!(screen.contains(&format!("{chip} sport")));
}

#[test]
fn number_keys_switch_views() {
    let mut app = app();
    press(&mut app, KeyCode::Char('4'));
    assert_eq!(app.view(), View::Disclaimer);
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.view(), View::Home);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.view(), View::Advisor);
}

#[test]
fn advisor_keys_edit_the_draft_only() {
    let mut app = app();
    app.navigate(View::Advisor);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.form().field(), FormField::Budget);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.form().draft().budget_usd(), 6_500);
    assert_eq!(app.profile().budget_usd(), 6_000);

    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.form().draft().budget_usd(), 6_000);
}

#[test]
fn modal_swallows_other_keys() {
    let (mut app, opener) = app_with(UiOptions::default());
    app.request_open_link("https://www.honda.com/");
    press(&mut app, KeyCode::Char('4'));
    assert_eq!(app.view(), View::Home);

    press(&mut app, KeyCode::Char('y'));
    assert!(app.modal().is_none());
    assert_eq!(opener.opened(), ["https://www.honda.com/"]);
}

#[test]
fn escape_cancels_outbound_link() {
    let (mut app, opener) = app_with(UiOptions::default());
    app.request_open_link("https://www.honda.com/");
    assert!(matches!(app.modal(), Some(Modal::OutboundLink { .. })));
    press(&mut app, KeyCode::Esc);
    assert!(app.modal().is_none());
    assert!(opener.opened().is_empty());
}

#[test]
fn chat_focus_captures_typing() {
    let mut app = app();
    app.navigate(View::Recommendations);
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.focus(), Focus::Chat);

    type_text(&mut app, "q1c");
    assert_eq!(app.chat_input(), "q1c");
    assert!(!app.should_quit());
    assert_eq!(app.view(), View::Recommendations);

    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.chat_input(), "q1");
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.focus(), Focus::List);
}

#[test]
fn tab_toggles_timeline() {
    let mut app = app();
    app.navigate(View::Recommendations);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.list_mode(), ListMode::Timeline);
    let screen = render(&app, 120, 30);
    assert!(screen.contains("Timeline"));
}

#[test]
fn ctrl_c_quits_from_anywhere() {
    let mut app = app();
    app.navigate(View::Recommendations);
    app.focus_chat();
    let quit = apply_event(
        &mut app,
        Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
    );
    assert!(quit);
}

#[tokio::test]
async fn skeletons_render_while_running() {
    let mut app = app();
    app.navigate(View::Recommendations);
    assert!(app.start_run());
    let skeleton = crate::glyphs(UiOptions::default()).skeleton;
    let screen = render(&app, 120, 40);
    assert!(screen.contains(skeleton));
    assert!(screen.contains("Updating recommendations"));
}
