//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, user_id, title, original_url, short_code, custom_alias, created_at";

/// PostgreSQL repository for short links.
///
/// Every code a link occupies is also claimed in `reserved_codes` inside the
/// same transaction, so a code can never be held by two records at once.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Claims `code` in the shared namespace.
///
/// A duplicate surfaces as a unique violation on `reserved_codes_pkey`, which
/// [`AppError`] maps to the "already taken" conflict.
pub(crate) async fn reserve_code(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO reserved_codes (code) VALUES ($1)")
        .bind(code)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Releases codes previously claimed with [`reserve_code`].
pub(crate) async fn release_codes(
    tx: &mut Transaction<'_, Postgres>,
    codes: &[&str],
) -> Result<(), sqlx::Error> {
    let owned: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
    sqlx::query("DELETE FROM reserved_codes WHERE code = ANY($1)")
        .bind(owned)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut tx = self.pool.begin().await?;

        reserve_code(&mut tx, &new_link.short_code).await?;
        if let Some(alias) = &new_link.custom_alias {
            reserve_code(&mut tx, alias).await?;
        }

        let link = sqlx::query_as::<_, ShortLink>(&format!(
            r#"
            INSERT INTO links (user_id, title, original_url, short_code, custom_alias)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.user_id)
        .bind(&new_link.title)
        .bind(&new_link.original_url)
        .bind(&new_link.short_code)
        .bind(&new_link.custom_alias)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE custom_alias = $1"
        ))
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let links = sqlx::query_as::<_, ShortLink>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query_as::<_, ShortLink>(&format!(
            "DELETE FROM links WHERE id = $1 RETURNING {LINK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(link) = deleted else {
            return Ok(false);
        };

        release_codes(&mut tx, &link.codes()).await?;
        tx.commit().await?;

        Ok(true)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
