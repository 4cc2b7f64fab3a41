//! DTOs for linktree endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use crate::application::services::{ItemDraft, LinkTreeDraft};
use crate::domain::entities::{LinkTree, LinkTreeItem, LinkTreeItemPatch, LinkTreePatch};

/// Request body for `POST /api/linktree`.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkTreeRequest {
    /// Generated when absent or empty.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub short_code: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub title: String,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,

    #[validate(length(min = 1, max = 32))]
    pub theme: Option<String>,
}

impl From<CreateLinkTreeRequest> for LinkTreeDraft {
    fn from(req: CreateLinkTreeRequest) -> Self {
        Self {
            short_code: req.short_code,
            title: req.title,
            bio: req.bio,
            avatar_url: req.avatar_url,
            theme: req.theme,
        }
    }
}

/// Request body for `PATCH /api/linktree`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLinkTreeRequest {
    pub short_code: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,

    #[validate(length(min = 1, max = 32))]
    pub theme: Option<String>,
}

impl From<UpdateLinkTreeRequest> for LinkTreePatch {
    fn from(req: UpdateLinkTreeRequest) -> Self {
        Self {
            short_code: req.short_code,
            title: req.title,
            bio: req.bio,
            avatar_url: req.avatar_url,
            theme: req.theme,
        }
    }
}

/// Request body for `POST /api/linktree/items`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    #[validate(length(min = 1, max = 2048))]
    pub url: String,

    /// Detected from the URL when absent.
    pub icon: Option<String>,
}

impl From<CreateItemRequest> for ItemDraft {
    fn from(req: CreateItemRequest) -> Self {
        Self {
            title: req.title,
            url: req.url,
            icon: req.icon,
        }
    }
}

/// Request body for `PATCH /api/linktree/items/{id}`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2048))]
    pub url: Option<String>,

    pub icon: Option<String>,

    pub is_active: Option<bool>,
}

impl From<UpdateItemRequest> for LinkTreeItemPatch {
    fn from(req: UpdateItemRequest) -> Self {
        Self {
            title: req.title,
            url: req.url,
            icon: req.icon,
            is_active: req.is_active,
        }
    }
}

/// Request body for `PUT /api/linktree/items/order`.
#[derive(Debug, Deserialize)]
pub struct ReorderItemsRequest {
    /// Every item id of the page, in the new display order.
    pub item_ids: Vec<i64>,
}

/// Query string for `GET /api/linktree/analytics`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<u32>,
}

/// A linktree with its items and public URL.
#[derive(Debug, Serialize)]
pub struct LinkTreeResponse {
    #[serde(flatten)]
    pub tree: LinkTree,
    pub public_url: String,
    pub items: Vec<LinkTreeItem>,
}
