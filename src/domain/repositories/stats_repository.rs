//! Repository trait for visit analytics.

use crate::domain::entities::{Click, NewClick, NewView, View};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Total clicks recorded for one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LinkClickCount {
    pub link_id: i64,
    pub clicks: i64,
}

/// Repository interface for recording and querying visits.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Inserts one click row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a link that
    /// was deleted between resolution and recording.
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Inserts one page-view row.
    async fn record_view(&self, new_view: NewView) -> Result<View, AppError>;

    /// Lists all clicks for a link, newest first.
    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError>;

    /// Click totals for every link owned by a user.
    async fn click_counts_for_user(&self, user_id: &str) -> Result<Vec<LinkClickCount>, AppError>;

    /// Lists a page's views recorded at or after `since`, oldest first.
    async fn views_since(
        &self,
        linktree_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<View>, AppError>;

    /// Counts all recorded clicks.
    async fn count_clicks(&self) -> Result<i64, AppError>;
}
