// SPDX-License-Identifier: MIT

//! Reviews passthrough route.

use crate::error::{AppError, Result};
use crate::services::ReviewsSummary;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/reviews", get(get_reviews))
}

#[derive(Deserialize)]
struct ReviewsQuery {
    #[serde(rename = "placeId")]
    place_id: Option<String>,
}

/// Proxy the external reviews provider, normalized for the widget.
async fn get_reviews(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReviewsQuery>,
) -> Result<Json<ReviewsSummary>> {
    let place_id = params
        .place_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Place ID required".to_string()))?;

    let summary = state.reviews.fetch_reviews(&place_id).await?;
    Ok(Json(summary))
}
