//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link and reserves its code (and alias) in the
    /// shared namespace.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] ("This URL is already taken") if the code
    /// or alias is already reserved by any link or linktree.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its database id.
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by its generated short code.
    async fn find_by_short_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by its custom alias.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError>;

    /// Lists a user's links, newest first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<ShortLink>, AppError>;

    /// Deletes a link and releases its codes.
    ///
    /// Returns `Ok(false)` if no link had this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Counts all links.
    async fn count(&self) -> Result<i64, AppError>;
}
