//! PostgreSQL implementation of linktree repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::pg_link_repository::{release_codes, reserve_code};
use crate::domain::entities::{
    LinkTree, LinkTreeItem, LinkTreeItemPatch, LinkTreePatch, NewLinkTree, NewLinkTreeItem,
};
use crate::domain::repositories::LinkTreeRepository;
use crate::error::AppError;

const TREE_COLUMNS: &str =
    "id, user_id, short_code, title, bio, avatar_url, theme, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, linktree_id, title, url, icon, order_index, is_active, created_at";

/// PostgreSQL repository for linktree pages and their items.
pub struct PgLinkTreeRepository {
    pool: Arc<PgPool>,
}

impl PgLinkTreeRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn tree_not_found(id: i64) -> AppError {
    AppError::not_found("Linktree not found", json!({ "id": id }))
}

fn item_not_found(id: i64) -> AppError {
    AppError::not_found("Linktree item not found", json!({ "id": id }))
}

#[async_trait]
impl LinkTreeRepository for PgLinkTreeRepository {
    async fn create(&self, new_tree: NewLinkTree) -> Result<LinkTree, AppError> {
        let mut tx = self.pool.begin().await?;

        reserve_code(&mut tx, &new_tree.short_code).await?;

        let tree = sqlx::query_as::<_, LinkTree>(&format!(
            r#"
            INSERT INTO linktrees (user_id, short_code, title, bio, avatar_url, theme)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TREE_COLUMNS}
            "#
        ))
        .bind(&new_tree.user_id)
        .bind(&new_tree.short_code)
        .bind(&new_tree.title)
        .bind(&new_tree.bio)
        .bind(&new_tree.avatar_url)
        .bind(&new_tree.theme)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(tree)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LinkTree>, AppError> {
        let tree = sqlx::query_as::<_, LinkTree>(&format!(
            "SELECT {TREE_COLUMNS} FROM linktrees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(tree)
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<LinkTree>, AppError> {
        let tree = sqlx::query_as::<_, LinkTree>(&format!(
            "SELECT {TREE_COLUMNS} FROM linktrees WHERE short_code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(tree)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<LinkTree>, AppError> {
        let tree = sqlx::query_as::<_, LinkTree>(&format!(
            "SELECT {TREE_COLUMNS} FROM linktrees WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(tree)
    }

    async fn update(&self, id: i64, patch: LinkTreePatch) -> Result<LinkTree, AppError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT short_code FROM linktrees WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let current = current.ok_or_else(|| tree_not_found(id))?;

        if let Some(code) = patch.short_code.as_deref().filter(|c| *c != current) {
            release_codes(&mut tx, &[current.as_str()]).await?;
            reserve_code(&mut tx, code).await?;
        }

        let tree = sqlx::query_as::<_, LinkTree>(&format!(
            r#"
            UPDATE linktrees
            SET short_code = COALESCE($2, short_code),
                title = COALESCE($3, title),
                bio = COALESCE($4, bio),
                avatar_url = COALESCE($5, avatar_url),
                theme = COALESCE($6, theme),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TREE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.short_code)
        .bind(&patch.title)
        .bind(&patch.bio)
        .bind(&patch.avatar_url)
        .bind(&patch.theme)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(tree)
    }

    async fn list_items(
        &self,
        linktree_id: i64,
        active_only: bool,
    ) -> Result<Vec<LinkTreeItem>, AppError> {
        let items = sqlx::query_as::<_, LinkTreeItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM linktree_items
            WHERE linktree_id = $1
              AND (is_active OR NOT $2)
            ORDER BY order_index ASC, id ASC
            "#
        ))
        .bind(linktree_id)
        .bind(active_only)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(items)
    }

    async fn find_item(&self, item_id: i64) -> Result<Option<LinkTreeItem>, AppError> {
        let item = sqlx::query_as::<_, LinkTreeItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM linktree_items WHERE id = $1"
        ))
        .bind(item_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(item)
    }

    async fn next_order_index(&self, linktree_id: i64) -> Result<i32, AppError> {
        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(order_index) + 1, 0) FROM linktree_items WHERE linktree_id = $1",
        )
        .bind(linktree_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(next)
    }

    async fn add_item(&self, new_item: NewLinkTreeItem) -> Result<LinkTreeItem, AppError> {
        let item = sqlx::query_as::<_, LinkTreeItem>(&format!(
            r#"
            INSERT INTO linktree_items (linktree_id, title, url, icon, order_index)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(new_item.linktree_id)
        .bind(&new_item.title)
        .bind(&new_item.url)
        .bind(&new_item.icon)
        .bind(new_item.order_index)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(item)
    }

    async fn update_item(
        &self,
        item_id: i64,
        patch: LinkTreeItemPatch,
    ) -> Result<LinkTreeItem, AppError> {
        let item = sqlx::query_as::<_, LinkTreeItem>(&format!(
            r#"
            UPDATE linktree_items
            SET title = COALESCE($2, title),
                url = COALESCE($3, url),
                icon = COALESCE($4, icon),
                is_active = COALESCE($5, is_active)
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item_id)
        .bind(&patch.title)
        .bind(&patch.url)
        .bind(&patch.icon)
        .bind(patch.is_active)
        .fetch_optional(self.pool.as_ref())
        .await?;

        item.ok_or_else(|| item_not_found(item_id))
    }

    async fn delete_item(&self, item_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM linktree_items WHERE id = $1")
            .bind(item_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn reorder_items(
        &self,
        linktree_id: i64,
        ordered_ids: Vec<i64>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for (position, item_id) in ordered_ids.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| AppError::bad_request("Too many items", json!({})))?;

            sqlx::query(
                "UPDATE linktree_items SET order_index = $3 WHERE id = $1 AND linktree_id = $2",
            )
            .bind(item_id)
            .bind(linktree_id)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
