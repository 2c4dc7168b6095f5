// SPDX-License-Identifier: MIT

//! Social-proof activity backend for the storefront widget.
//!
//! Records customer activity events (signups, purchases, reviews),
//! serves the most recent undisplayed events to the widget, proxies the
//! external reviews provider, and pushes live updates to connected
//! browsers over SSE.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::ActivityStore;
use services::{ActivityService, BroadcastHub, ReviewsClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: ActivityStore,
    pub activity_service: ActivityService,
    pub hub: BroadcastHub,
    pub reviews: ReviewsClient,
}
