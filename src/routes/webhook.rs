// SPDX-License-Identifier: MIT

//! Webhook routes for external integrations.

use crate::error::Result;
use crate::services::WebhookPayload;
use crate::AppState;
use axum::{
    extract::{Json, Path, State},
    routing::post,
    Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Webhook routes. The shared-secret middleware is applied in
/// routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/webhook/{kind}", post(handle_event))
}

#[derive(Serialize)]
struct WebhookResponse {
    success: bool,
}

/// Record an activity for a known external event kind.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(payload): Json<WebhookPayload>,
) -> Result<Json<WebhookResponse>> {
    tracing::info!(kind = %kind, "Webhook event received");

    let activity = state
        .activity_service
        .record_webhook_event(&kind, payload)
        .await?;

    tracing::info!(
        kind = %kind,
        activity_id = activity.id,
        "Webhook event recorded"
    );

    Ok(Json(WebhookResponse { success: true }))
}
