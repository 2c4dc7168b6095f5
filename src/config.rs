// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; the recency windows and heartbeat
//! interval are deliberately configuration rather than literals.

use std::env;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// SQLite database URL (e.g. `sqlite://social_proof.db`)
    pub database_url: String,
    /// Shared secret for mutating endpoints (`x-api-key` header)
    pub api_key: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Fallback location substituted on webhook events with no city
    pub default_location: String,
    /// How long an undisplayed activity stays eligible for the widget
    pub display_window: Duration,
    /// Window for the aggregate stats endpoint
    pub stats_window: Duration,
    /// SSE heartbeat interval
    pub heartbeat_interval: Duration,
    /// Default number of records returned by `/activity/recent`
    pub recent_limit: u32,
    /// Reviews provider API key (proxied so it never reaches the browser)
    pub reviews_api_key: Option<String>,
    /// Reviews provider endpoint
    pub reviews_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://social_proof.db".to_string()),
            api_key: env::var("API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("API_KEY"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            default_location: env::var("DEFAULT_LOCATION")
                .unwrap_or_else(|_| "London".to_string()),
            display_window: duration_var("DISPLAY_WINDOW_SECS", 3600),
            stats_window: duration_var("STATS_WINDOW_SECS", 24 * 3600),
            heartbeat_interval: duration_var("HEARTBEAT_SECS", 30),
            recent_limit: env::var("RECENT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            reviews_api_key: env::var("REVIEWS_API_KEY")
                .ok()
                .map(|v| v.trim().to_string()),
            reviews_base_url: env::var("REVIEWS_BASE_URL").unwrap_or_else(|_| {
                "https://maps.googleapis.com/maps/api/place/details/json".to_string()
            }),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            database_url: "sqlite::memory:".to_string(),
            api_key: "test-api-key".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            default_location: "London".to_string(),
            display_window: Duration::from_secs(3600),
            stats_window: Duration::from_secs(24 * 3600),
            heartbeat_interval: Duration::from_secs(30),
            recent_limit: 10,
            reviews_api_key: None,
            reviews_base_url: "http://localhost:0/unused".to_string(),
        }
    }
}

/// Read a duration (in seconds) from an environment variable.
fn duration_var(name: &str, default_secs: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
