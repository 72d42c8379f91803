//! Chat turns typed into the panel and resolved by the frame loop.

use crossterm::event::KeyCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rideready_core::{CHAT_NETWORK_ERROR, ChatEntry};
use rideready_engine::ChatTurnOutcome;
use rideready_types::ui::{Focus, View};

use crate::common::{app, bike, mount_chat, mount_images, mount_recommend, press, render, settle, type_text};

#[tokio::test]
async fn typed_request_refreshes_and_echoes_cards() {
    let server = MockServer::start().await;
    mount_images(&server, "https://img.example.com/bike.jpg").await;
    mount_chat(
        &server,
        json!({
            "message": "Here are some lighter picks.",
            "actions": [{ "type": "RECOMMEND", "pin_ids": ["honda_rebel_500"] }]
        }),
    )
    .await;
    mount_recommend(
        &server,
        json!([
            bike("honda_rebel_500", Some(true)),
            bike("yamaha_r3", Some(true)),
            bike("ktm_390_duke", Some(true)),
        ]),
    )
    .await;

    let (mut app, _) = app(&server);
    app.navigate(View::Recommendations);
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.focus(), Focus::Chat);
    type_text(&mut app, "something lighter");
    press(&mut app, KeyCode::Enter);
    assert!(app.chat_input().is_empty());
    assert!(app.chat_busy());

    settle(&mut app).await;

    assert_eq!(app.timeline().len(), 1);
    let entries = app.transcript().entries();
    assert!(matches!(&entries[0], ChatEntry::User(m) if m == "something lighter"));
    match &entries[1] {
        ChatEntry::Assistant { text, cards } => {
            assert_eq!(text, "Here are some lighter picks.");
            assert_eq!(cards.len(), 2);
        }
        other => panic!("expected assistant reply, got {other:?}"),
    }

    let screen = render(&app, 140, 40);
    assert!(screen.contains("Here are some lighter picks."));
}

#[tokio::test]
async fn offtopic_reply_leaves_recommendations_alone() {
    let server = MockServer::start().await;
    mount_chat(&server, json!({ "topic": "OFFTOPIC", "actions": [] })).await;
    Mock::given(method("POST"))
        .and(path("/api/recommend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let (mut app, _) = app(&server);
    let outcome = app.chat_turn("what's the weather").await;

    assert_eq!(
        outcome,
        ChatTurnOutcome::Replied {
            profile_updated: false,
            run: None
        }
    );
    assert!(app.timeline().is_empty());
    assert!(matches!(
        app.transcript().entries().last(),
        Some(ChatEntry::Assistant { cards, .. }) if cards.is_empty()
    ));
}

#[tokio::test]
async fn planner_failure_shows_one_error_bubble() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let (mut app, _) = app(&server);
    app.navigate(View::Recommendations);
    app.focus_chat();
    type_text(&mut app, "hello");
    press(&mut app, KeyCode::Enter);
    settle(&mut app).await;

    let errors = app
        .transcript()
        .entries()
        .iter()
        .filter(|e| matches!(e, ChatEntry::Error(m) if m == CHAT_NETWORK_ERROR))
        .count();
    assert_eq!(errors, 1);
    assert!(app.timeline().is_empty());
}
