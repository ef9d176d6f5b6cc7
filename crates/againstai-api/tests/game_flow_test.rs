//! End-to-end game flow over HTTP.

mod common;

use std::sync::Arc;

use againstai_core::ids::UserId;
use againstai_test_support::ScriptedBackend;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_two_players_play_a_round_over_http() {
    // Arrange
    let backend = Arc::new(ScriptedBackend::new(
        "Анна потушила пожар, а Борис задохнулся в дыму.\nВЫЖИЛИ: Анна",
    ));
    let state = common::test_state_with(backend.clone());
    let app = common::build_test_app(state.clone());

    common::send_event(&app, 1, json!({ "type": "start" })).await;
    common::send_event(&app, 1, json!({ "type": "text", "text": "Анна Иванова" })).await;
    common::send_event(&app, 1, json!({ "type": "create_lobby" })).await;
    let lobby_id = state.coordinator.directory().lobby_of(UserId(1)).unwrap();

    common::send_event(&app, 2, json!({ "type": "start" })).await;
    common::send_event(&app, 2, json!({ "type": "text", "text": "Борис Петров" })).await;
    common::send_event(
        &app,
        2,
        json!({ "type": "join_lobby", "target": lobby_id.to_string() }),
    )
    .await;

    // Act
    common::send_event(&app, 1, json!({ "type": "start_game" })).await;
    common::send_event(&app, 1, json!({ "type": "choose_mode", "mode": "competitive" })).await;
    common::send_event(&app, 1, json!({ "type": "random_scenario" })).await;
    common::send_event(&app, 1, json!({ "type": "text", "text": "тушу пожар" })).await;
    common::send_event(&app, 2, json!({ "type": "text", "text": "прячусь в шкафу" })).await;

    // Assert
    let (status, lobby) = common::get_json(app.clone(), &format!("/api/v1/lobbies/{lobby_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lobby["state"], "waiting_for_scenario");
    assert_eq!(lobby["round"], 1);
    assert_eq!(lobby["players"][0]["is_alive"], true);
    assert_eq!(lobby["players"][1]["is_alive"], false);
    assert_eq!(backend.prompts().len(), 1);

    let boris = common::message_texts(&app, 2).await;
    assert!(boris.iter().any(|t| t.contains("Борис задохнулся")));
    assert!(common::message_texts(&app, 2).await.is_empty());
}

#[tokio::test]
async fn test_member_cannot_start_game() {
    let state = common::test_state();
    let app = common::build_test_app(state.clone());
    common::send_event(&app, 1, json!({ "type": "start" })).await;
    common::send_event(&app, 1, json!({ "type": "text", "text": "Анна" })).await;
    common::send_event(&app, 1, json!({ "type": "create_lobby" })).await;
    let invite_code = {
        let lobby_id = state.coordinator.directory().lobby_of(UserId(1)).unwrap();
        state.coordinator.directory().snapshot(&lobby_id).unwrap().invite_code
    };
    common::send_event(&app, 2, json!({ "type": "start" })).await;
    common::send_event(&app, 2, json!({ "type": "text", "text": "Борис" })).await;
    common::send_event(&app, 2, json!({ "type": "text", "text": invite_code })).await;

    let (status, json) =
        common::post_json(app.clone(), "/api/v1/users/2/events", &json!({ "type": "start_game" }))
            .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "not_captain");
    let texts = common::message_texts(&app, 2).await;
    assert_eq!(
        texts.last().map(String::as_str),
        Some("Это может сделать только капитан лобби.")
    );
}

#[tokio::test]
async fn test_invalid_name_returns_400_and_guidance() {
    let app = common::build_test_app(common::test_state());
    common::send_event(&app, 3, json!({ "type": "start" })).await;

    let (status, json) = common::post_json(
        app.clone(),
        "/api/v1/users/3/events",
        &json!({ "type": "text", "text": "R2-D2" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    let texts = common::message_texts(&app, 3).await;
    assert!(texts.last().unwrap().starts_with("Имя: недопустимые символы"));
}

#[tokio::test]
async fn test_unknown_lobby_returns_404() {
    let app = common::build_test_app(common::test_state());

    let (status, json) = common::get_json(app, "/api/v1/lobbies/deadbeef").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "lobby_not_found");
}
