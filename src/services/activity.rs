// SPDX-License-Identifier: MIT

//! Activity submission service.
//!
//! Validates inbound submissions, applies webhook templates, persists
//! via the store and fans the new record out to live subscribers.

use serde::Deserialize;

use crate::db::ActivityStore;
use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityDraft};
use crate::services::BroadcastHub;

/// External webhook payload. Field names vary by event kind, so this
/// is a superset; the kind decides which ones are read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// Signup events carry the customer's first name
    pub first_name: Option<String>,
    /// Wholesale events carry the full customer name
    pub customer_name: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
    pub order_value: Option<f64>,
}

/// Coordinates validation, persistence and broadcast for new activities.
#[derive(Clone)]
pub struct ActivityService {
    store: ActivityStore,
    hub: BroadcastHub,
    default_location: String,
}

impl ActivityService {
    pub fn new(store: ActivityStore, hub: BroadcastHub, default_location: String) -> Self {
        Self {
            store,
            hub,
            default_location,
        }
    }

    /// Validate and persist a submission, then broadcast it.
    ///
    /// Broadcast is best-effort: a subscriber failure never fails the
    /// submission or rolls back the insert.
    pub async fn submit(&self, draft: ActivityDraft) -> Result<Activity> {
        validate(&draft)?;

        let activity = self.store.insert(&draft).await?;

        let delivered = self.hub.publish(&activity);
        tracing::info!(
            activity_id = activity.id,
            action_type = %activity.action_type,
            delivered,
            "Activity recorded"
        );

        Ok(activity)
    }

    /// Map a known webhook event onto a canned activity and submit it.
    ///
    /// Unlike direct submission, the location falls back to the
    /// configured default when the payload has no city.
    pub async fn record_webhook_event(
        &self,
        kind: &str,
        payload: WebhookPayload,
    ) -> Result<Activity> {
        let (customer_name, action_type, action_text) = match kind {
            "signup" => (
                payload.first_name.unwrap_or_default(),
                "signup",
                "just joined the loyalty programme",
            ),
            "wholesale-order" => (
                payload.customer_name.unwrap_or_default(),
                "purchase",
                "just placed a wholesale order",
            ),
            other => return Err(AppError::UnsupportedEvent(other.to_string())),
        };

        let location = payload
            .city
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.default_location.clone());

        self.submit(ActivityDraft {
            customer_name,
            location,
            action_type: action_type.to_string(),
            action_text: action_text.to_string(),
            timestamp: None,
            verified: true,
        })
        .await
    }
}

/// Reject drafts with empty required fields, naming every missing one.
fn validate(draft: &ActivityDraft) -> Result<()> {
    let mut missing = Vec::new();
    if draft.customer_name.trim().is_empty() {
        missing.push("customerName");
    }
    if draft.location.trim().is_empty() {
        missing.push("location");
    }
    if draft.action_type.trim().is_empty() {
        missing.push("actionType");
    }
    if draft.action_text.trim().is_empty() {
        missing.push("actionText");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(missing))
    }
}
