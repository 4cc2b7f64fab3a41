//! Short link creation, retrieval and deletion.

use std::sync::Arc;

use qrcode::QrCode;
use qrcode::render::svg;
use serde_json::json;

use crate::application::services::{AliasService, Resolver};
use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::validate_custom_alias;
use crate::utils::url_normalizer::normalize_url;

/// Inserts tried when a concurrent creator claims the generated code.
const CREATE_ATTEMPTS: usize = 2;

/// Smallest edge of a rendered QR code, in pixels.
const QR_MIN_DIMENSION: u32 = 200;

/// Service for creating and managing a user's short links.
///
/// Every generated code and alias is checked against the whole shared
/// namespace before insertion.
#[derive(Clone)]
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    aliases: AliasService,
    resolver: Resolver,
    public_base_url: String,
}

impl LinkService {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        aliases: AliasService,
        resolver: Resolver,
        public_base_url: String,
    ) -> Self {
        Self {
            link_repository,
            aliases,
            resolver,
            public_base_url,
        }
    }

    /// Creates a short link owned by `user_id`.
    ///
    /// A 6-character code is always generated; `custom_alias`, when present,
    /// is an additional code that also resolves to the link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty title, an invalid URL or
    /// a malformed alias. Returns the "already taken" [`AppError::Conflict`]
    /// if the alias is in use, including when a concurrent creator claims it
    /// between the check and the insert. A generated code claimed that way is
    /// replaced once before giving up.
    pub async fn create_link(
        &self,
        user_id: &str,
        title: &str,
        original_url: &str,
        custom_alias: Option<String>,
    ) -> Result<ShortLink, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::bad_request(
                "Title is required",
                json!({ "field": "title" }),
            ));
        }

        let original_url = normalize_url(original_url)?;

        let custom_alias = match custom_alias.map(|a| a.trim().to_string()) {
            Some(alias) if !alias.is_empty() => {
                validate_custom_alias(&alias)?;
                self.aliases.ensure_available(&alias).await?;
                Some(alias)
            }
            _ => None,
        };

        let mut attempt = 1;
        let link = loop {
            let short_code = self.aliases.generate_unique_code().await?;

            let result = self
                .link_repository
                .create(NewShortLink {
                    user_id: user_id.to_string(),
                    title: title.to_string(),
                    original_url: original_url.clone(),
                    short_code: short_code.clone(),
                    custom_alias: custom_alias.clone(),
                })
                .await;

            match result {
                Ok(link) => break link,
                Err(e)
                    if e.is_taken()
                        && attempt < CREATE_ATTEMPTS
                        && self.alias_still_free(custom_alias.as_deref()).await? =>
                {
                    tracing::debug!(
                        code = %short_code,
                        "Generated code claimed concurrently, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        tracing::info!(
            link_id = link.id,
            code = %link.short_code,
            alias = ?link.custom_alias,
            "Short link created"
        );

        Ok(link)
    }

    /// After a late "already taken" insert, tells whether the generated code
    /// rather than the alias was the one claimed.
    async fn alias_still_free(&self, custom_alias: Option<&str>) -> Result<bool, AppError> {
        match custom_alias {
            Some(alias) => self.aliases.validate_availability(alias).await,
            None => Ok(true),
        }
    }

    /// Lists a user's links, newest first.
    pub async fn list_links(&self, user_id: &str) -> Result<Vec<ShortLink>, AppError> {
        self.link_repository.list_by_user(user_id).await
    }

    /// Fetches a link owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or belongs to
    /// another user, without revealing which.
    pub async fn get_link(&self, user_id: &str, id: i64) -> Result<ShortLink, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .filter(|link| link.user_id == user_id)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    /// Deletes a link and its clicks, and drops its cached resolutions.
    pub async fn delete_link(&self, user_id: &str, id: i64) -> Result<(), AppError> {
        let link = self.get_link(user_id, id).await?;

        if !self.link_repository.delete(link.id).await? {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "id": id }),
            ));
        }

        self.resolver.forget(link.codes()).await;
        tracing::info!(link_id = link.id, "Short link deleted");

        Ok(())
    }

    /// Number of links across all users.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }

    /// The public URL visitors use, preferring the alias when present.
    pub fn short_url(&self, link: &ShortLink) -> String {
        self.public_url(link.public_code())
    }

    /// `PUBLIC_BASE_URL/<code>` for any code in the shared namespace.
    pub fn public_url(&self, code: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), code)
    }

    /// Renders the link's public URL as an SVG QR code.
    pub fn qr_svg(&self, link: &ShortLink) -> Result<String, AppError> {
        let short_url = self.short_url(link);
        let qr_code = QrCode::new(short_url.as_bytes()).map_err(|e| {
            AppError::internal(
                "QR code generation failed",
                json!({ "reason": e.to_string() }),
            )
        })?;

        Ok(qr_code
            .render::<svg::Color>()
            .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
            .quiet_zone(true)
            .build())
    }
}
