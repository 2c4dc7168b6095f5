// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod activity;
pub mod broadcast;
pub mod reviews;

pub use activity::{ActivityService, WebhookPayload};
pub use broadcast::{BroadcastHub, Subscription};
pub use reviews::{ReviewsClient, ReviewsSummary};
