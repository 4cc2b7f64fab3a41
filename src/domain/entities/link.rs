//! Short link entity representing a code-to-destination mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL owned by a user.
///
/// A link is reachable through its generated `short_code` and, when set,
/// through its `custom_alias`. Both live in the namespace shared with
/// link-in-bio pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShortLink {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// The code used in the public short URL: the alias when present.
    pub fn public_code(&self) -> &str {
        self.custom_alias.as_deref().unwrap_or(&self.short_code)
    }

    /// All codes this link occupies in the shared namespace.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes = vec![self.short_code.as_str()];
        if let Some(alias) = self.custom_alias.as_deref() {
            codes.push(alias);
        }
        codes
    }
}

/// Input data for creating a new short link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub user_id: String,
    pub title: String,
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
}
