//! Click and page-view analytics.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::json;

use crate::domain::entities::{Click, View};
use crate::domain::repositories::{
    LinkClickCount, LinkRepository, LinkTreeRepository, StatsRepository,
};
use crate::error::AppError;

/// Default look-back window for linktree analytics.
pub const DEFAULT_ANALYTICS_DAYS: u32 = 30;

/// Upper bound on the analytics window.
pub const MAX_ANALYTICS_DAYS: u32 = 365;

/// Number of individual clicks returned alongside the breakdowns.
const RECENT_CLICKS: usize = 20;

/// Click breakdowns for one short link.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinkStats {
    pub link_id: i64,
    pub total_clicks: usize,
    pub by_device: BTreeMap<String, i64>,
    pub by_country: BTreeMap<String, i64>,
    pub by_city: BTreeMap<String, i64>,
    pub recent_clicks: Vec<Click>,
}

/// View breakdowns for a linktree over the last `days` days.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinkTreeAnalytics {
    pub linktree_id: i64,
    pub days: u32,
    pub total_views: usize,
    /// Keyed by `YYYY-MM-DD` (UTC).
    pub views_by_date: BTreeMap<String, i64>,
    pub views_by_device: BTreeMap<String, i64>,
    pub views_by_country: BTreeMap<String, i64>,
    pub views_by_browser: BTreeMap<String, i64>,
}

/// Service for reading visit analytics of a user's links and page.
#[derive(Clone)]
pub struct StatsService {
    stats: Arc<dyn StatsRepository>,
    links: Arc<dyn LinkRepository>,
    linktrees: Arc<dyn LinkTreeRepository>,
}

impl StatsService {
    pub fn new(
        stats: Arc<dyn StatsRepository>,
        links: Arc<dyn LinkRepository>,
        linktrees: Arc<dyn LinkTreeRepository>,
    ) -> Self {
        Self {
            stats,
            links,
            linktrees,
        }
    }

    /// Click breakdowns for a link owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or belongs to
    /// another user.
    pub async fn link_stats(&self, user_id: &str, link_id: i64) -> Result<LinkStats, AppError> {
        let owned = self
            .links
            .find_by_id(link_id)
            .await?
            .is_some_and(|link| link.user_id == user_id);
        if !owned {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "id": link_id }),
            ));
        }

        let clicks = self.stats.clicks_for_link(link_id).await?;

        Ok(LinkStats {
            link_id,
            total_clicks: clicks.len(),
            by_device: tally(clicks.iter().map(|c| c.device_type.as_str())),
            by_country: tally(clicks.iter().map(|c| c.country.as_str())),
            by_city: tally(clicks.iter().map(|c| c.city.as_str())),
            recent_clicks: clicks.into_iter().take(RECENT_CLICKS).collect(),
        })
    }

    /// View breakdowns for the user's page over the last `days` days.
    ///
    /// `days` defaults to 30 and is clamped to 1..=365.
    pub async fn linktree_analytics(
        &self,
        user_id: &str,
        days: Option<u32>,
    ) -> Result<LinkTreeAnalytics, AppError> {
        let tree = self
            .linktrees
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Linktree not found", json!({})))?;

        let days = days
            .unwrap_or(DEFAULT_ANALYTICS_DAYS)
            .clamp(1, MAX_ANALYTICS_DAYS);
        let since = Utc::now() - Duration::days(i64::from(days));
        let views = self.stats.views_since(tree.id, since).await?;

        Ok(summarize_views(tree.id, days, &views))
    }

    /// Click totals for each of the user's links.
    pub async fn click_totals(&self, user_id: &str) -> Result<BTreeMap<i64, i64>, AppError> {
        let counts = self.stats.click_counts_for_user(user_id).await?;

        Ok(counts
            .into_iter()
            .map(|LinkClickCount { link_id, clicks }| (link_id, clicks))
            .collect())
    }
}

fn summarize_views(linktree_id: i64, days: u32, views: &[View]) -> LinkTreeAnalytics {
    let dates: Vec<String> = views
        .iter()
        .map(|v| v.viewed_at.date_naive().format("%Y-%m-%d").to_string())
        .collect();

    LinkTreeAnalytics {
        linktree_id,
        days,
        total_views: views.len(),
        views_by_date: tally(dates.iter().map(String::as_str)),
        views_by_device: tally(views.iter().map(|v| v.device_type.as_str())),
        views_by_country: tally(views.iter().map(|v| v.country.as_str())),
        views_by_browser: tally(views.iter().map(|v| v.browser.as_str())),
    }
}

fn tally<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<String, i64> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}
