//! Shared application state for HTTP handlers.

use std::sync::Arc;

use crate::application::services::{
    AliasService, AuthService, LinkService, LinkTreeService, Resolver, StatsService,
};
use crate::domain::click_recorder::ClickRecorder;
use crate::domain::codespace::Codespace;
use crate::domain::repositories::{
    LinkRepository, LinkTreeRepository, StatsRepository, TokenRepository,
};
use crate::infrastructure::cache::CacheService;

/// Repository handles the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub links: Arc<dyn LinkRepository>,
    pub linktrees: Arc<dyn LinkTreeRepository>,
    pub stats: Arc<dyn StatsRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

/// Settings the HTTP layer needs besides the services.
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub public_base_url: String,
    pub token_signing_secret: String,
    pub behind_proxy: bool,
}

/// Application state injected into every handler.
///
/// Cloning is cheap: services are behind `Arc` and the recorder holds only a
/// channel sender and a shared dedup window.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub linktree_service: Arc<LinkTreeService>,
    pub alias_service: Arc<AliasService>,
    pub stats_service: Arc<StatsService>,
    pub auth_service: Arc<AuthService>,
    pub resolver: Arc<Resolver>,
    pub recorder: ClickRecorder,
    pub cache: Arc<dyn CacheService>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for visitor IPs.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the services together.
    ///
    /// Every service that resolves or checks codes shares one [`Codespace`]
    /// and one [`Resolver`], so cache invalidation reaches the redirect path.
    pub fn new(
        repositories: Repositories,
        cache: Arc<dyn CacheService>,
        recorder: ClickRecorder,
        options: StateOptions,
    ) -> Self {
        let Repositories {
            links,
            linktrees,
            stats,
            tokens,
        } = repositories;

        let codespace = Codespace::new(links.clone(), linktrees.clone());
        let resolver = Resolver::new(codespace.clone(), cache.clone());
        let aliases = AliasService::new(codespace);

        let link_service = LinkService::new(
            links.clone(),
            aliases.clone(),
            resolver.clone(),
            options.public_base_url,
        );
        let linktree_service =
            LinkTreeService::new(linktrees.clone(), aliases.clone(), resolver.clone());
        let stats_service = StatsService::new(stats, links, linktrees);
        let auth_service = AuthService::new(tokens, options.token_signing_secret);

        Self {
            link_service: Arc::new(link_service),
            linktree_service: Arc::new(linktree_service),
            alias_service: Arc::new(aliases),
            stats_service: Arc::new(stats_service),
            auth_service: Arc::new(auth_service),
            resolver: Arc::new(resolver),
            recorder,
            cache,
            behind_proxy: options.behind_proxy,
        }
    }
}
