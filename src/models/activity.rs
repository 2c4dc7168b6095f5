// SPDX-License-Identifier: MIT

//! Customer activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored customer activity record.
///
/// Serialized field names match what the storefront widget expects
/// (`name`, `actionType`, ...), so a freshly inserted record can be
/// broadcast to live clients verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Server-assigned id; unique and never reused
    pub id: i64,
    /// Customer display name (first name only by convention)
    #[serde(rename = "name")]
    pub customer_name: String,
    /// Short location, e.g. a neighbourhood or city
    pub location: String,
    /// Categorical tag: "signup", "purchase", "review", or free-form
    pub action_type: String,
    /// Human-readable description of the action
    pub action_text: String,
    /// When the activity occurred (defaults to insert time)
    pub timestamp: DateTime<Utc>,
    pub verified: bool,
    /// Flips to true exactly once, when the widget has shown this record
    pub displayed: bool,
}

/// A validated-but-unpersisted activity submission.
#[derive(Debug, Clone)]
pub struct ActivityDraft {
    pub customer_name: String,
    pub location: String,
    pub action_type: String,
    pub action_text: String,
    /// Explicit event time; `None` means "now"
    pub timestamp: Option<DateTime<Utc>>,
    pub verified: bool,
}

/// Aggregate counts over the stats window.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_activities: i64,
    pub signups: i64,
    pub purchases: i64,
    pub reviews: i64,
    pub displayed: i64,
}
