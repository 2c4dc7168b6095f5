// SPDX-License-Identifier: MIT

//! Activity store backed by SQLite.
//!
//! Owns the `activities` table and the four core operations:
//! - `insert` (server-assigned id, defaulted fields)
//! - `recent_undisplayed` (windowed widget query)
//! - `mark_displayed` (idempotent batch update)
//! - `stats` (windowed aggregates)

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::QueryBuilder;

use crate::error::AppError;
use crate::models::{Activity, ActivityDraft, ActivityStats};

// AUTOINCREMENT keeps rowids monotonic and never reused, which the
// widget relies on for its id-based dedup.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS activities (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_name TEXT NOT NULL,
    location      TEXT NOT NULL,
    action_type   TEXT NOT NULL,
    action_text   TEXT NOT NULL,
    timestamp     TIMESTAMP NOT NULL,
    verified      BOOLEAN NOT NULL DEFAULT 0,
    displayed     BOOLEAN NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_activities_timestamp
    ON activities(timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_activities_displayed
    ON activities(displayed, timestamp);
";

/// Activity database client.
#[derive(Clone)]
pub struct ActivityStore {
    pool: SqlitePool,
}

impl ActivityStore {
    /// Connect to the database at `url`, creating the file and schema
    /// if they do not exist yet.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        let store = Self { pool };
        store.init_schema().await?;

        tracing::info!(url, "Connected to activity database");
        Ok(store)
    }

    /// In-memory store for tests and local experiments.
    ///
    /// A single connection is required: each pooled connection would
    /// otherwise get its own private `:memory:` database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    /// Persist a new activity with a server-assigned id.
    ///
    /// Returns the fully populated record (id, defaulted timestamp,
    /// `displayed = false`) so callers can broadcast it verbatim.
    pub async fn insert(&self, draft: &ActivityDraft) -> Result<Activity, AppError> {
        let timestamp = draft.timestamp.unwrap_or_else(Utc::now);

        sqlx::query_as::<_, Activity>(
            "INSERT INTO activities
                 (customer_name, location, action_type, action_text, timestamp, verified, displayed)
             VALUES (?, ?, ?, ?, ?, ?, 0)
             RETURNING *",
        )
        .bind(&draft.customer_name)
        .bind(&draft.location)
        .bind(&draft.action_type)
        .bind(&draft.action_text)
        .bind(timestamp)
        .bind(draft.verified)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch up to `limit` undisplayed activities whose timestamp falls
    /// within `window` of now, newest first (ties broken by id, most
    /// recently inserted first).
    pub async fn recent_undisplayed(
        &self,
        limit: u32,
        window: Duration,
    ) -> Result<Vec<Activity>, AppError> {
        let cutoff = Utc::now() - chrono::Duration::seconds(window.as_secs() as i64);

        sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities
             WHERE displayed = 0 AND timestamp > ?
             ORDER BY timestamp DESC, id DESC
             LIMIT ?",
        )
        .bind(cutoff)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark the given activities as displayed.
    ///
    /// Ids that do not exist or are already displayed are silently
    /// skipped; the returned count is how many rows changed in *this*
    /// call, so a repeat call with the same ids returns 0.
    pub async fn mark_displayed(&self, ids: &[i64]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Err(AppError::BadRequest("Invalid or empty ids array".to_string()));
        }

        let mut query = QueryBuilder::new(
            "UPDATE activities SET displayed = 1 WHERE displayed = 0 AND id IN (",
        );
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        query.push(")");

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Aggregate counts over the trailing `window`.
    pub async fn stats(&self, window: Duration) -> Result<ActivityStats, AppError> {
        let cutoff = Utc::now() - chrono::Duration::seconds(window.as_secs() as i64);

        sqlx::query_as::<_, ActivityStats>(
            "SELECT
                 COUNT(*) AS total_activities,
                 COUNT(CASE WHEN action_type = 'signup' THEN 1 END) AS signups,
                 COUNT(CASE WHEN action_type = 'purchase' THEN 1 END) AS purchases,
                 COUNT(CASE WHEN action_type = 'review' THEN 1 END) AS reviews,
                 COUNT(CASE WHEN displayed = 1 THEN 1 END) AS displayed
             FROM activities
             WHERE timestamp > ?",
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}
