// SPDX-License-Identifier: MIT

//! Activity endpoints: widget queries, submission, display bookkeeping
//! and the live SSE stream.

use crate::error::Result;
use crate::models::{Activity, ActivityDraft, ActivityStats};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

const MAX_RECENT_LIMIT: u32 = 50;

/// Public activity routes (no auth).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activity/recent", get(recent))
        .route("/activity/stats", get(stats))
        .route("/activity/stream", get(stream))
}

/// Activity routes behind the shared-secret check.
/// The auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activity", post(submit))
        .route("/activity/mark-displayed", post(mark_displayed))
}

// ─── Recent Activity ─────────────────────────────────────────

#[derive(Deserialize)]
struct RecentQuery {
    limit: Option<u32>,
}

/// Undisplayed activities within the display window, newest first.
async fn recent(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentQuery>,
) -> Result<Json<Vec<Activity>>> {
    let limit = params
        .limit
        .unwrap_or(state.config.recent_limit)
        .min(MAX_RECENT_LIMIT);

    let activities = state
        .store
        .recent_undisplayed(limit, state.config.display_window)
        .await?;

    Ok(Json(activities))
}

// ─── Submission ──────────────────────────────────────────────

/// Direct activity submission.
///
/// All fields default to empty so that missing ones are reported by
/// validation (naming the field) rather than as a deserialize failure.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    action_type: String,
    #[serde(default)]
    action_text: String,
    #[serde(default)]
    verified: bool,
    /// Optional explicit event time; defaults to now
    timestamp: Option<DateTime<Utc>>,
}

/// Record a new activity and broadcast it to live subscribers.
async fn submit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<Activity>> {
    let activity = state
        .activity_service
        .submit(ActivityDraft {
            customer_name: req.name,
            location: req.location,
            action_type: req.action_type,
            action_text: req.action_text,
            timestamp: req.timestamp,
            verified: req.verified,
        })
        .await?;

    Ok(Json(activity))
}

// ─── Mark Displayed ──────────────────────────────────────────

#[derive(Deserialize)]
struct MarkDisplayedRequest {
    #[serde(default)]
    ids: Vec<i64>,
}

#[derive(Serialize)]
struct MarkDisplayedResponse {
    updated: u64,
}

/// Mark activities as displayed so the widget never repeats them.
async fn mark_displayed(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MarkDisplayedRequest>,
) -> Result<Json<MarkDisplayedResponse>> {
    let updated = state.store.mark_displayed(&req.ids).await?;
    Ok(Json(MarkDisplayedResponse { updated }))
}

// ─── Stats ───────────────────────────────────────────────────

/// Aggregate counts over the stats window.
async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<ActivityStats>> {
    let stats = state.store.stats(state.config.stats_window).await?;
    Ok(Json(stats))
}

// ─── Live Stream ─────────────────────────────────────────────

/// SSE stream of newly recorded activities.
///
/// Subscribers only see activities recorded after they connect; the
/// keep-alive comment ping stops intermediaries from closing the
/// connection as idle. Disconnecting drops the subscription, which
/// unregisters it from the hub.
async fn stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let subscription = state.hub.subscribe();
    tracing::debug!(
        subscriber_id = subscription.id(),
        subscribers = state.hub.subscriber_count(),
        "Stream subscriber connected"
    );

    let events = subscription.map(|activity| {
        let event = Event::default().json_data(&activity).unwrap_or_else(|e| {
            tracing::error!(error = %e, activity_id = activity.id, "Failed to serialize activity");
            Event::default().comment("serialization error")
        });
        Ok(event)
    });

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(state.config.heartbeat_interval)
            .text("ping"),
    )
}
