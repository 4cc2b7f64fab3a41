//! Link-in-bio page entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Theme applied when none is chosen.
pub const DEFAULT_THEME: &str = "default";

/// A user's link-in-bio page.
///
/// Each user owns at most one. Its `short_code` shares the global namespace
/// with short links and takes priority over them during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LinkTree {
    pub id: i64,
    pub user_id: String,
    pub short_code: String,
    pub title: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub theme: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single entry shown on a link-in-bio page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LinkTreeItem {
    pub id: i64,
    pub linktree_id: i64,
    pub title: String,
    pub url: String,
    pub icon: String,
    pub order_index: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a link-in-bio page.
#[derive(Debug, Clone)]
pub struct NewLinkTree {
    pub user_id: String,
    pub short_code: String,
    pub title: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub theme: String,
}

/// Partial update of a link-in-bio page. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct LinkTreePatch {
    pub short_code: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub theme: Option<String>,
}

/// Input data for appending an item to a page.
#[derive(Debug, Clone)]
pub struct NewLinkTreeItem {
    pub linktree_id: i64,
    pub title: String,
    pub url: String,
    pub icon: String,
    pub order_index: i32,
}

/// Partial update of a page item. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct LinkTreeItemPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

/// A page together with the items visitors can see.
#[derive(Debug, Clone, Serialize)]
pub struct PublicLinkTree {
    pub tree: LinkTree,
    pub items: Vec<LinkTreeItem>,
}
