//! PostgreSQL implementation of statistics repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick, NewView, View};
use crate::domain::repositories::{LinkClickCount, StatsRepository};
use crate::error::AppError;

const CLICK_COLUMNS: &str = "id, link_id, city, country, device_type, browser, clicked_at";
const VIEW_COLUMNS: &str = "id, linktree_id, city, country, device_type, browser, viewed_at";

/// PostgreSQL repository for visit recording and analytics.
///
/// Rows are append-only; the timestamps come from the database clock.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let details = new_click.details;

        let click = sqlx::query_as::<_, Click>(&format!(
            r#"
            INSERT INTO clicks (link_id, city, country, device_type, browser)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CLICK_COLUMNS}
            "#
        ))
        .bind(new_click.link_id)
        .bind(&details.city)
        .bind(&details.country)
        .bind(details.device.as_str())
        .bind(&details.browser)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(click)
    }

    async fn record_view(&self, new_view: NewView) -> Result<View, AppError> {
        let details = new_view.details;

        let view = sqlx::query_as::<_, View>(&format!(
            r#"
            INSERT INTO linktree_views (linktree_id, city, country, device_type, browser)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {VIEW_COLUMNS}
            "#
        ))
        .bind(new_view.linktree_id)
        .bind(&details.city)
        .bind(&details.country)
        .bind(details.device.as_str())
        .bind(&details.browser)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(view)
    }

    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let clicks = sqlx::query_as::<_, Click>(&format!(
            r#"
            SELECT {CLICK_COLUMNS}
            FROM clicks
            WHERE link_id = $1
            ORDER BY clicked_at DESC, id DESC
            "#
        ))
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }

    async fn click_counts_for_user(&self, user_id: &str) -> Result<Vec<LinkClickCount>, AppError> {
        let counts = sqlx::query_as::<_, LinkClickCount>(
            r#"
            SELECT l.id AS link_id, COUNT(c.id) AS clicks
            FROM links l
            LEFT JOIN clicks c ON c.link_id = l.id
            WHERE l.user_id = $1
            GROUP BY l.id
            ORDER BY l.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(counts)
    }

    async fn views_since(
        &self,
        linktree_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<View>, AppError> {
        let views = sqlx::query_as::<_, View>(&format!(
            r#"
            SELECT {VIEW_COLUMNS}
            FROM linktree_views
            WHERE linktree_id = $1
              AND viewed_at >= $2
            ORDER BY viewed_at ASC, id ASC
            "#
        ))
        .bind(linktree_id)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(views)
    }

    async fn count_clicks(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
