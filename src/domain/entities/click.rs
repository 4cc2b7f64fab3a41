//! Visit analytics entities: clicks on short links and views of linktree pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value stored when a location or browser cannot be determined.
pub const UNKNOWN: &str = "Unknown";

/// Coarse device category derived from the visitor's user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
    Unknown,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
            DeviceClass::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded visit to a short link.
///
/// Created once per admitted redirect and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub city: String,
    pub country: String,
    pub device_type: String,
    pub browser: String,
    pub clicked_at: DateTime<Utc>,
}

/// A recorded visit to a public linktree page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct View {
    pub id: i64,
    pub linktree_id: i64,
    pub city: String,
    pub country: String,
    pub device_type: String,
    pub browser: String,
    pub viewed_at: DateTime<Utc>,
}

/// Visitor attributes shared by clicks and views.
///
/// The timestamp is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitDetails {
    pub city: String,
    pub country: String,
    pub device: DeviceClass,
    pub browser: String,
}

impl VisitDetails {
    /// Details for a visit about which nothing could be determined.
    pub fn unknown() -> Self {
        Self {
            city: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            device: DeviceClass::Unknown,
            browser: UNKNOWN.to_string(),
        }
    }
}

/// Input data for recording a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_id: i64,
    pub details: VisitDetails,
}

/// Input data for recording a page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewView {
    pub linktree_id: i64,
    pub details: VisitDetails,
}
