//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use againstai_adjudication::AdjudicationClient;
use againstai_api::routes;
use againstai_api::state::AppState;
use againstai_core::backend::AdjudicationBackend;
use againstai_core::settings::GameSettings;
use againstai_lobby::domain::scenarios::ScenarioDeck;
use againstai_test_support::{FailingBackend, FixedClock, MockRng, SequenceRng};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// State with deterministic clock and RNG around `backend`.
pub fn test_state_with(backend: Arc<dyn AdjudicationBackend>) -> AppState {
    AppState::new(
        GameSettings::default(),
        AdjudicationClient::new(backend),
        ScenarioDeck::default(),
        Arc::new(FixedClock::standard()),
        Box::new(SequenceRng::new((0..36).collect())),
        Box::new(MockRng),
    )
}

/// State whose adjudication backend is always down.
pub fn test_state() -> AppState {
    test_state_with(Arc::new(FailingBackend::unavailable()))
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    routes::build_router(state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// POST a user event and assert it was accepted.
pub async fn send_event(app: &Router, user_id: i64, event: serde_json::Value) {
    let (status, json) = post_json(
        app.clone(),
        &format!("/api/v1/users/{user_id}/events"),
        &event,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "event {event} rejected: {json}");
}

/// Drain a user's outbox and return the message texts.
pub async fn message_texts(app: &Router, user_id: i64) -> Vec<String> {
    let (status, json) = get_json(app.clone(), &format!("/api/v1/users/{user_id}/messages")).await;
    assert_eq!(status, StatusCode::OK);
    json.as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap().to_owned())
        .collect()
}
