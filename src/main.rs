// SPDX-License-Identifier: MIT

//! Social-Proof API Server
//!
//! Records customer activity events for the storefront widget, serves
//! recent-activity queries, proxies the external reviews provider and
//! pushes live updates over SSE.

use social_proof_api::{
    config::Config,
    db::ActivityStore,
    services::{ActivityService, BroadcastHub, ReviewsClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Social-Proof API");

    // Initialize the activity store (creates schema on first run)
    let store = ActivityStore::connect(&config.database_url)
        .await
        .expect("Failed to connect to activity database");

    // Live broadcast hub for SSE subscribers
    let hub = BroadcastHub::new();

    let activity_service = ActivityService::new(
        store.clone(),
        hub.clone(),
        config.default_location.clone(),
    );

    let reviews = ReviewsClient::new(
        config.reviews_base_url.clone(),
        config.reviews_api_key.clone(),
    );
    if config.reviews_api_key.is_none() {
        tracing::warn!("REVIEWS_API_KEY not set; /reviews will return an upstream error");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        activity_service,
        hub,
        reviews,
    });

    // Build router
    let app = social_proof_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("social_proof_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
