//! Profile form to rendered cards, driven through key events.

use crossterm::event::KeyCode;
use serde_json::json;
use wiremock::MockServer;

use rideready_types::ui::{ListMode, Modal, View};

use crate::common::{app, bike, mount_health, mount_images, mount_recommend, press, render, settle};

const IMAGE_URL: &str = "https://img.example.com/bike.jpg";

#[tokio::test]
async fn submitted_profile_renders_cards_and_abs_warning() {
    let server = MockServer::start().await;
    mount_health(&server, "boot-1").await;
    mount_images(&server, IMAGE_URL).await;
    mount_recommend(
        &server,
        json!([bike("suzuki_sv650", Some(false)), bike("yamaha_r3", Some(true))]),
    )
    .await;

    let (mut app, _) = app(&server);
    app.startup().await;
    assert!(app.health().is_some());

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.view(), View::Advisor);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.view(), View::Recommendations);
    assert_eq!(app.profile().budget_usd(), 6_250);
    assert!(app.is_running());

    settle(&mut app).await;

    // First run: the curated pick moves ahead of the server's order.
    let ids: Vec<_> = app.visible_items().iter().map(|i| i.identity().to_string()).collect();
    assert_eq!(ids, ["yamaha_r3", "suzuki_sv650"]);
    assert_eq!(app.modal(), Some(&Modal::AbsWarning));

    let screen = render(&app, 130, 40);
    assert!(screen.contains("No ABS"));

    press(&mut app, KeyCode::Enter);
    assert!(app.modal().is_none());

    let screen = render(&app, 130, 40);
    assert!(screen.contains("yamaha r3"));
    assert!(screen.contains(IMAGE_URL));
    assert!(screen.contains("42 bikes"));
}

#[tokio::test]
async fn outbound_link_is_confirmed_once_per_session() {
    let server = MockServer::start().await;
    mount_images(&server, IMAGE_URL).await;
    mount_recommend(
        &server,
        json!([bike("yamaha_r3", Some(true)), bike("honda_cb300r", Some(true))]),
    )
    .await;

    let (mut app, opener) = app(&server);
    app.navigate(View::Recommendations);
    press(&mut app, KeyCode::Char('r'));
    settle(&mut app).await;
    assert!(app.modal().is_none());

    press(&mut app, KeyCode::Char('o'));
    assert!(matches!(app.modal(), Some(Modal::OutboundLink { .. })));
    press(&mut app, KeyCode::Char('n'));
    assert!(opener.opened().is_empty());

    press(&mut app, KeyCode::Char('o'));
    assert!(app.modal().is_some());
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(opener.opened(), ["https://example.com/yamaha_r3"]);

    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('o'));
    assert!(app.modal().is_none());
    assert_eq!(
        opener.opened(),
        ["https://example.com/yamaha_r3", "https://example.com/honda_cb300r"]
    );
}

#[tokio::test]
async fn refreshes_build_a_timeline_until_cleared() {
    let server = MockServer::start().await;
    mount_images(&server, IMAGE_URL).await;
    mount_recommend(&server, json!([bike("yamaha_r3", Some(true))])).await;

    let (mut app, _) = app(&server);
    app.navigate(View::Recommendations);
    for _ in 0..2 {
        press(&mut app, KeyCode::Char('r'));
        settle(&mut app).await;
    }
    assert_eq!(app.timeline().len(), 2);
    assert_eq!(app.visible_items().len(), 1);

    press(&mut app, KeyCode::Tab);
    assert_eq!(app.list_mode(), ListMode::Timeline);
    assert!(render(&app, 130, 40).contains("Timeline"));

    press(&mut app, KeyCode::Char('c'));
    assert!(app.timeline().is_empty());
    assert!(render(&app, 130, 40).contains("No recommendations yet"));
}
