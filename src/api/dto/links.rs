//! DTOs for short link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Request body for `POST /api/links`.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Destination; normalized by the service, so only the size is checked here.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Extra code that also resolves to the link. An empty string means none.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub custom_alias: Option<String>,
}

/// A short link as returned by the API.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub title: String,
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub short_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: ShortLink, short_url: String, clicks: Option<i64>) -> Self {
        Self {
            id: link.id,
            title: link.title,
            original_url: link.original_url,
            short_code: link.short_code,
            custom_alias: link.custom_alias,
            short_url,
            clicks,
            created_at: link.created_at,
        }
    }
}

/// Response for `GET /api/links`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}
