//! Link-in-bio page management and public rendering data.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;

use crate::application::services::{AliasService, Resolver};
use crate::domain::entities::{
    DEFAULT_THEME, LinkTree, LinkTreeItem, LinkTreeItemPatch, LinkTreePatch, NewLinkTree,
    NewLinkTreeItem, PublicLinkTree,
};
use crate::domain::repositories::LinkTreeRepository;
use crate::error::AppError;
use crate::utils::code_generator::validate_custom_alias;
use crate::utils::icon::detect_social_icon;
use crate::utils::url_normalizer::normalize_item_url;

/// Fields a user supplies when creating a page.
#[derive(Debug, Clone, Default)]
pub struct LinkTreeDraft {
    pub short_code: Option<String>,
    pub title: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub theme: Option<String>,
}

/// Fields a user supplies when adding an item.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
}

/// Service for a user's single link-in-bio page and its items.
#[derive(Clone)]
pub struct LinkTreeService {
    repository: Arc<dyn LinkTreeRepository>,
    aliases: AliasService,
    resolver: Resolver,
}

impl LinkTreeService {
    pub fn new(
        repository: Arc<dyn LinkTreeRepository>,
        aliases: AliasService,
        resolver: Resolver,
    ) -> Self {
        Self {
            repository,
            aliases,
            resolver,
        }
    }

    /// The user's page with all of its items, active or not.
    pub async fn get_for_user(&self, user_id: &str) -> Result<PublicLinkTree, AppError> {
        let tree = self.owned_tree(user_id).await?;
        let items = self.repository.list_items(tree.id, false).await?;
        Ok(PublicLinkTree { tree, items })
    }

    /// Creates the user's page.
    ///
    /// A code is generated when none is supplied. A supplied code must pass
    /// alias validation and be free in every namespace.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the user already has a page or the
    /// code is taken.
    pub async fn create(&self, user_id: &str, draft: LinkTreeDraft) -> Result<LinkTree, AppError> {
        if self.repository.find_by_user(user_id).await?.is_some() {
            return Err(AppError::conflict(
                "You already have a linktree",
                json!({ "user_id": user_id }),
            ));
        }

        let title = required_text(&draft.title, "title")?;
        let short_code = match non_empty(draft.short_code) {
            Some(code) => {
                validate_custom_alias(&code)?;
                self.aliases.ensure_available(&code).await?;
                code
            }
            None => self.aliases.generate_unique_code().await?,
        };

        let tree = self
            .repository
            .create(NewLinkTree {
                user_id: user_id.to_string(),
                short_code,
                title,
                bio: non_empty(draft.bio),
                avatar_url: non_empty(draft.avatar_url),
                theme: non_empty(draft.theme).unwrap_or_else(|| DEFAULT_THEME.to_string()),
            })
            .await?;

        tracing::info!(linktree_id = tree.id, code = %tree.short_code, "Linktree created");
        Ok(tree)
    }

    /// Updates page metadata, re-checking availability on a code change.
    pub async fn update(&self, user_id: &str, patch: LinkTreePatch) -> Result<LinkTree, AppError> {
        let tree = self.owned_tree(user_id).await?;

        let new_code = non_empty(patch.short_code).filter(|code| *code != tree.short_code);
        if let Some(code) = &new_code {
            validate_custom_alias(code)?;
            self.aliases.ensure_available(code).await?;
        }

        let title = match patch.title {
            Some(title) => Some(required_text(&title, "title")?),
            None => None,
        };

        let updated = self
            .repository
            .update(
                tree.id,
                LinkTreePatch {
                    short_code: new_code.clone(),
                    title,
                    bio: patch.bio,
                    avatar_url: patch.avatar_url,
                    theme: non_empty(patch.theme),
                },
            )
            .await?;

        if new_code.is_some() {
            self.resolver.forget([tree.short_code.as_str()]).await;
            tracing::info!(
                linktree_id = tree.id,
                old_code = %tree.short_code,
                new_code = %updated.short_code,
                "Linktree code changed"
            );
        }

        Ok(updated)
    }

    /// Appends an item, detecting its icon from the URL unless one is given.
    pub async fn add_item(&self, user_id: &str, draft: ItemDraft) -> Result<LinkTreeItem, AppError> {
        let tree = self.owned_tree(user_id).await?;
        let title = required_text(&draft.title, "title")?;
        let url = normalize_item_url(&draft.url)?;
        let icon = non_empty(draft.icon).unwrap_or_else(|| detect_social_icon(&url).to_string());
        let order_index = self.repository.next_order_index(tree.id).await?;

        self.repository
            .add_item(NewLinkTreeItem {
                linktree_id: tree.id,
                title,
                url,
                icon,
                order_index,
            })
            .await
    }

    /// Updates an item; a changed URL re-detects the icon unless one is given.
    pub async fn update_item(
        &self,
        user_id: &str,
        item_id: i64,
        patch: LinkTreeItemPatch,
    ) -> Result<LinkTreeItem, AppError> {
        self.owned_item(user_id, item_id).await?;

        let title = match patch.title {
            Some(title) => Some(required_text(&title, "title")?),
            None => None,
        };
        let url = match patch.url {
            Some(url) => Some(normalize_item_url(&url)?),
            None => None,
        };
        let icon = non_empty(patch.icon)
            .or_else(|| url.as_deref().map(|u| detect_social_icon(u).to_string()));

        self.repository
            .update_item(
                item_id,
                LinkTreeItemPatch {
                    title,
                    url,
                    icon,
                    is_active: patch.is_active,
                },
            )
            .await
    }

    pub async fn delete_item(&self, user_id: &str, item_id: i64) -> Result<(), AppError> {
        self.owned_item(user_id, item_id).await?;

        if self.repository.delete_item(item_id).await? {
            Ok(())
        } else {
            Err(item_not_found(item_id))
        }
    }

    /// Sets each item's `order_index` to its position in `ordered_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] unless `ordered_ids` lists every item
    /// of the page exactly once.
    pub async fn reorder_items(
        &self,
        user_id: &str,
        ordered_ids: Vec<i64>,
    ) -> Result<Vec<LinkTreeItem>, AppError> {
        let tree = self.owned_tree(user_id).await?;
        let items = self.repository.list_items(tree.id, false).await?;

        let current: HashSet<i64> = items.iter().map(|item| item.id).collect();
        let requested: HashSet<i64> = ordered_ids.iter().copied().collect();
        if requested.len() != ordered_ids.len() || requested != current {
            return Err(AppError::bad_request(
                "Order must list every item exactly once",
                json!({ "expected": items.len(), "provided": ordered_ids.len() }),
            ));
        }

        self.repository.reorder_items(tree.id, ordered_ids).await?;
        self.repository.list_items(tree.id, false).await
    }

    /// The page as visitors see it: active items only, in display order.
    pub async fn public_page(&self, id: i64) -> Result<PublicLinkTree, AppError> {
        let tree = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Linktree not found", json!({ "id": id })))?;
        let items = self.repository.list_items(tree.id, true).await?;

        Ok(PublicLinkTree { tree, items })
    }

    async fn owned_tree(&self, user_id: &str) -> Result<LinkTree, AppError> {
        self.repository
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Linktree not found", json!({})))
    }

    async fn owned_item(&self, user_id: &str, item_id: i64) -> Result<LinkTreeItem, AppError> {
        let tree = self.owned_tree(user_id).await?;

        self.repository
            .find_item(item_id)
            .await?
            .filter(|item| item.linktree_id == tree.id)
            .ok_or_else(|| item_not_found(item_id))
    }
}

fn item_not_found(item_id: i64) -> AppError {
    AppError::not_found("Linktree item not found", json!({ "id": item_id }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(
            format!("{field} is required"),
            json!({ "field": field }),
        ));
    }
    Ok(trimmed.to_string())
}
