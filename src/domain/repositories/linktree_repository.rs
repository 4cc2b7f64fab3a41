//! Repository trait for link-in-bio pages and their items.

use crate::domain::entities::{
    LinkTree, LinkTreeItem, LinkTreeItemPatch, LinkTreePatch, NewLinkTree, NewLinkTreeItem,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for link-in-bio pages.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkTreeRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkTreeRepository: Send + Sync {
    /// Creates a page and reserves its short code in the shared namespace.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken or the user
    /// already owns a page.
    async fn create(&self, new_tree: NewLinkTree) -> Result<LinkTree, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<LinkTree>, AppError>;

    async fn find_by_short_code(&self, code: &str) -> Result<Option<LinkTree>, AppError>;

    async fn find_by_user(&self, user_id: &str) -> Result<Option<LinkTree>, AppError>;

    /// Applies a partial update. A changed short code is re-reserved and the
    /// previous one released in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the page does not exist and
    /// [`AppError::Conflict`] if a new short code is already taken.
    async fn update(&self, id: i64, patch: LinkTreePatch) -> Result<LinkTree, AppError>;

    /// Lists a page's items ordered by `order_index`.
    async fn list_items(
        &self,
        linktree_id: i64,
        active_only: bool,
    ) -> Result<Vec<LinkTreeItem>, AppError>;

    async fn find_item(&self, item_id: i64) -> Result<Option<LinkTreeItem>, AppError>;

    /// Returns the index that places a new item after all existing ones.
    async fn next_order_index(&self, linktree_id: i64) -> Result<i32, AppError>;

    async fn add_item(&self, new_item: NewLinkTreeItem) -> Result<LinkTreeItem, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the item does not exist.
    async fn update_item(
        &self,
        item_id: i64,
        patch: LinkTreeItemPatch,
    ) -> Result<LinkTreeItem, AppError>;

    /// Returns `Ok(false)` if no item had this id.
    async fn delete_item(&self, item_id: i64) -> Result<bool, AppError>;

    /// Sets each item's `order_index` to its position in `ordered_ids`.
    async fn reorder_items(&self, linktree_id: i64, ordered_ids: Vec<i64>)
    -> Result<(), AppError>;
}
