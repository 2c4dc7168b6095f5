// SPDX-License-Identifier: MIT

//! Reviews provider client.
//!
//! Proxies the third-party place-details API (keeping the API key
//! server-side) and normalizes raw reviews into the activity shape the
//! widget renders. Read-through only: nothing here touches the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Review bodies are cut to this many characters for the widget.
const REVIEW_TEXT_MAX_CHARS: usize = 100;

/// Client for the external reviews provider.
#[derive(Clone)]
pub struct ReviewsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Raw provider response envelope.
#[derive(Debug, Deserialize)]
struct PlaceDetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceDetailsResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceDetailsResult {
    #[serde(default)]
    reviews: Vec<RawReview>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    author_name: String,
    rating: u8,
    /// Provider event time, unix seconds
    time: i64,
    #[serde(default)]
    text: String,
}

/// One normalized review in the activity shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewActivity {
    /// First name only (privacy truncation)
    pub name: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub review_text: String,
    pub verified: bool,
}

/// Normalized reviews plus provider-level aggregates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsSummary {
    pub reviews: Vec<ReviewActivity>,
    pub total_reviews: u32,
    pub average_rating: f64,
}

impl ReviewsClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Fetch and normalize the reviews for one place.
    pub async fn fetch_reviews(&self, place_id: &str) -> Result<ReviewsSummary, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("Reviews API key not configured".to_string()))?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("place_id", place_id),
                ("fields", "reviews,rating,user_ratings_total"),
                ("key", api_key),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Provider returned HTTP {}",
                response.status()
            )));
        }

        let details: PlaceDetailsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Malformed provider response: {}", e)))?;

        if details.status != "OK" {
            return Err(AppError::Upstream(format!(
                "Provider status: {}",
                details.status
            )));
        }

        let result = details.result.unwrap_or(PlaceDetailsResult {
            reviews: Vec::new(),
            rating: None,
            user_ratings_total: None,
        });

        Ok(ReviewsSummary {
            reviews: result.reviews.iter().map(normalize_review).collect(),
            total_reviews: result.user_ratings_total.unwrap_or(0),
            average_rating: result.rating.unwrap_or(0.0),
        })
    }
}

/// Map one raw provider review onto the activity shape.
fn normalize_review(raw: &RawReview) -> ReviewActivity {
    let name = raw
        .author_name
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string();

    ReviewActivity {
        name,
        action: format!("left a {}-star review", raw.rating),
        timestamp: DateTime::from_timestamp(raw.time, 0).unwrap_or_else(Utc::now),
        review_text: truncate_with_ellipsis(&raw.text, REVIEW_TEXT_MAX_CHARS),
        verified: true,
    }
}

/// Cut `text` to at most `max_chars` characters and append "...".
fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}
