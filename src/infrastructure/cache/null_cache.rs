//! No-op cache used when Redis is not configured or unreachable.

use super::service::{CacheResult, CacheService};
use crate::domain::resolution::Resolution;
use async_trait::async_trait;
use tracing::debug;

/// A cache that stores nothing; every lookup is a miss.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_resolution(&self, _code: &str) -> CacheResult<Option<Resolution>> {
        Ok(None)
    }

    async fn set_resolution(
        &self,
        _code: &str,
        _resolution: &Resolution,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
