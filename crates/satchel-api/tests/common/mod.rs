//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use satchel_content::domain::starting_gear::StartingGearTable;
use satchel_event_store::memory_event_repository::InMemoryEventRepository;
use satchel_test_support::{FixedClock, RecordingCharacterMutator, fixed_now, sample_catalog};
use tower::ServiceExt;

use satchel_api::state::AppState;

/// Starting gear offered to the `fighter` class in integration tests.
pub const FIGHTER_GEAR_YAML: &str = "\
- class: fighter
  starting_gear:
    equipment_choices:
      - id: weapon
        options:
          - type: single
            item: sword
          - type: single
            item: dagger
    pack_choice:
      options:
        - explorers-pack
    given_items:
      - item: potion
        quantity: 2
";

/// Build app state over the sample catalog with an in-memory repository and
/// a fixed clock.
pub fn build_test_state() -> AppState {
    let starting_gear = StartingGearTable::from_yaml_str(FIGHTER_GEAR_YAML).unwrap();
    AppState::new(
        Arc::new(FixedClock(fixed_now())),
        Arc::new(InMemoryEventRepository::new()),
        sample_catalog(),
        starting_gear,
        Arc::new(RecordingCharacterMutator::new()),
        chrono::Duration::days(1),
    )
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    satchel_api::build_router(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a request with a JSON body and return the response.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, body).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
