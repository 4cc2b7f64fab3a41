//! Resolution of visited codes to linktree pages or redirect targets.

use std::sync::Arc;

use serde_json::json;

use crate::domain::codespace::{Codespace, Namespace};
use crate::domain::resolution::Resolution;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Resolves a code by probing the shared namespace in priority order.
///
/// A linktree code always shadows a short link code or alias. Positive
/// results are cached; misses are not.
#[derive(Clone)]
pub struct Resolver {
    codespace: Codespace,
    cache: Arc<dyn CacheService>,
}

impl Resolver {
    pub fn new(codespace: Codespace, cache: Arc<dyn CacheService>) -> Self {
        Self { codespace, cache }
    }

    /// Resolves `code` to exactly one [`Resolution`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when a store lookup fails, so callers
    /// can tell "does not exist" apart from "could not check".
    pub async fn resolve(&self, code: &str) -> Result<Resolution, AppError> {
        match self.cache.get_resolution(code).await {
            Ok(Some(resolution)) => return Ok(resolution),
            Ok(None) => {}
            Err(e) => tracing::warn!(code, error = %e, "Cache lookup failed"),
        }

        let hit = self
            .codespace
            .first_match(&Namespace::RESOLUTION_ORDER, code)
            .await
            .map_err(|e| {
                tracing::error!(code, error = %e, "Resolution lookup failed");
                AppError::unavailable(
                    "Link lookup is temporarily unavailable",
                    json!({ "code": code }),
                )
            })?;

        let Some((namespace, occupant)) = hit else {
            return Ok(Resolution::NotFound);
        };

        let resolution = Resolution::from(occupant);
        tracing::debug!(code, %namespace, "Code resolved");

        if let Err(e) = self.cache.set_resolution(code, &resolution, None).await {
            tracing::warn!(code, error = %e, "Failed to cache resolution");
        }

        Ok(resolution)
    }

    /// Drops cached resolutions for every given code.
    pub async fn forget<'a>(&self, codes: impl IntoIterator<Item = &'a str>) {
        for code in codes {
            if let Err(e) = self.cache.invalidate(code).await {
                tracing::warn!(code, error = %e, "Failed to invalidate cached resolution");
            }
        }
    }
}
