//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::resolution::Resolution;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of positive code resolutions.
///
/// Implementations must be thread-safe and fail open: a cache problem
/// degrades to a store lookup, it never fails a visit. `NotFound` is never
/// cached, so creating a link is visible immediately.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached resolution for `code`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(resolution))` on cache hit
    /// - `Ok(None)` on cache miss, or on a backend error after logging it
    async fn get_resolution(&self, code: &str) -> CacheResult<Option<Resolution>>;

    /// Stores a resolution with an optional TTL in seconds.
    ///
    /// Implementations fall back to their default TTL when `ttl_seconds` is
    /// `None`.
    async fn set_resolution(
        &self,
        code: &str,
        resolution: &Resolution,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached resolution.
    ///
    /// Used when a link is deleted or a linktree code changes.
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
