// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use social_proof_api::config::Config;
use social_proof_api::db::ActivityStore;
use social_proof_api::routes::create_router;
use social_proof_api::services::{ActivityService, BroadcastHub, ReviewsClient};
use social_proof_api::AppState;
use std::sync::Arc;

/// API key baked into `Config::test_default()`.
#[allow(dead_code)]
pub const TEST_API_KEY: &str = "test-api-key";

/// Create a test app backed by an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default()).await
}

/// Create a test app with a custom config (e.g. a short heartbeat).
#[allow(dead_code)]
pub async fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let store = ActivityStore::in_memory()
        .await
        .expect("Failed to create in-memory store");
    let hub = BroadcastHub::new();
    let activity_service = ActivityService::new(
        store.clone(),
        hub.clone(),
        config.default_location.clone(),
    );
    let reviews = ReviewsClient::new(config.reviews_base_url.clone(), None);

    let state = Arc::new(AppState {
        config,
        store,
        activity_service,
        hub,
        reviews,
    });

    (create_router(state.clone()), state)
}

/// Build an authenticated JSON POST request.
#[allow(dead_code)]
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", TEST_API_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body was not valid JSON")
}
