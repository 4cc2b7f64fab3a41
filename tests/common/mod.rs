#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::connect_info::MockConnectInfo;
use axum::routing::get;
use axum::{Router, middleware};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

use linkhub::api;
use linkhub::api::handlers::{health_handler, redirect_handler};
use linkhub::api::middleware::auth;
use linkhub::application::services::auth_service::hash_token;
use linkhub::domain::click_event::VisitEvent;
use linkhub::domain::click_recorder::ClickRecorder;
use linkhub::domain::dedup::DedupWindow;
use linkhub::domain::entities::{
    Click, LinkTree, LinkTreeItem, LinkTreeItemPatch, LinkTreePatch, NewClick, NewLinkTree,
    NewLinkTreeItem, NewShortLink, NewView, ShortLink, View,
};
use linkhub::domain::repositories::{
    ApiToken, LinkClickCount, LinkRepository, LinkTreeRepository, StatsRepository,
    TokenRepository,
};
use linkhub::error::AppError;
use linkhub::infrastructure::cache::NullCache;
use linkhub::state::{AppState, Repositories, StateOptions};
use linkhub::web;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const PUBLIC_BASE_URL: &str = "https://lnk.test";

/// Peer address every test request appears to come from.
pub fn peer() -> SocketAddr {
    "203.0.113.7:40000".parse().unwrap()
}

// ─── In-memory store ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Data {
    next_id: i64,
    links: Vec<ShortLink>,
    linktrees: Vec<LinkTree>,
    items: Vec<LinkTreeItem>,
    clicks: Vec<Click>,
    views: Vec<View>,
    tokens: Vec<ApiToken>,
    reserved: HashSet<String>,
    failing: bool,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing {
            Err(AppError::internal(
                "Database error",
                json!({ "reason": "store offline" }),
            ))
        } else {
            Ok(())
        }
    }

    fn reserve(&mut self, code: &str) -> Result<(), AppError> {
        if self.reserved.insert(code.to_string()) {
            Ok(())
        } else {
            Err(AppError::taken(code))
        }
    }
}

/// Shared in-memory stand-in for every repository.
///
/// Codes from links and linktrees land in one reserved set, so collisions
/// across namespaces behave like the `reserved_codes` table.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<Data>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            links: Arc::new(self.clone()),
            linktrees: Arc::new(self.clone()),
            stats: Arc::new(self.clone()),
            tokens: Arc::new(self.clone()),
        }
    }

    /// Makes every repository call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub fn seed_link(
        &self,
        user_id: &str,
        short_code: &str,
        alias: Option<&str>,
        url: &str,
    ) -> ShortLink {
        let mut data = self.lock();
        data.reserve(short_code).unwrap();
        if let Some(alias) = alias {
            data.reserve(alias).unwrap();
        }
        let link = ShortLink {
            id: data.next_id(),
            user_id: user_id.to_string(),
            title: format!("Link {short_code}"),
            original_url: url.to_string(),
            short_code: short_code.to_string(),
            custom_alias: alias.map(str::to_string),
            created_at: Utc::now(),
        };
        data.links.push(link.clone());
        link
    }

    pub fn seed_linktree(&self, user_id: &str, short_code: &str, title: &str) -> LinkTree {
        let mut data = self.lock();
        data.reserve(short_code).unwrap();
        let now = Utc::now();
        let tree = LinkTree {
            id: data.next_id(),
            user_id: user_id.to_string(),
            short_code: short_code.to_string(),
            title: title.to_string(),
            bio: None,
            avatar_url: None,
            theme: "default".to_string(),
            created_at: now,
            updated_at: now,
        };
        data.linktrees.push(tree.clone());
        tree
    }

    pub fn seed_item(&self, linktree_id: i64, title: &str, url: &str, active: bool) -> LinkTreeItem {
        let mut data = self.lock();
        let order_index = data
            .items
            .iter()
            .filter(|i| i.linktree_id == linktree_id)
            .count() as i32;
        let item = LinkTreeItem {
            id: data.next_id(),
            linktree_id,
            title: title.to_string(),
            url: url.to_string(),
            icon: "link".to_string(),
            order_index,
            is_active: active,
            created_at: Utc::now(),
        };
        data.items.push(item.clone());
        item
    }

    pub fn seed_click(&self, link_id: i64, device: &str, country: &str, city: &str) {
        let mut data = self.lock();
        let click = Click {
            id: data.next_id(),
            link_id,
            city: city.to_string(),
            country: country.to_string(),
            device_type: device.to_string(),
            browser: "Chrome".to_string(),
            clicked_at: Utc::now(),
        };
        data.clicks.push(click);
    }

    pub fn seed_view(&self, linktree_id: i64, viewed_at: DateTime<Utc>, device: &str) {
        let mut data = self.lock();
        let view = View {
            id: data.next_id(),
            linktree_id,
            city: "Unknown".to_string(),
            country: "Unknown".to_string(),
            device_type: device.to_string(),
            browser: "Firefox".to_string(),
            viewed_at,
        };
        data.views.push(view);
    }

    /// Issues a token for `user_id` and returns its raw value.
    pub fn issue_token(&self, user_id: &str) -> String {
        let raw = format!("token-for-{user_id}");
        let mut data = self.lock();
        let token = ApiToken {
            id: data.next_id(),
            name: format!("{user_id}-test"),
            user_id: user_id.to_string(),
            token_hash: hash_token(SIGNING_SECRET, &raw),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        data.tokens.push(token);
        raw
    }

    pub fn revoke_tokens_of(&self, user_id: &str) {
        for token in self.lock().tokens.iter_mut() {
            if token.user_id == user_id {
                token.revoked_at = Some(Utc::now());
            }
        }
    }

    pub fn is_reserved(&self, code: &str) -> bool {
        self.lock().reserved.contains(code)
    }

    pub fn links(&self) -> Vec<ShortLink> {
        self.lock().links.clone()
    }

    pub fn clicks(&self) -> Vec<Click> {
        self.lock().clicks.clone()
    }

    pub fn token_last_used(&self, user_id: &str) -> Option<DateTime<Utc>> {
        self.lock()
            .tokens
            .iter()
            .find(|t| t.user_id == user_id)
            .and_then(|t| t.last_used_at)
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut data = self.lock();
        data.check()?;
        data.reserve(&new_link.short_code)?;
        if let Some(alias) = &new_link.custom_alias {
            if let Err(e) = data.reserve(alias) {
                data.reserved.remove(&new_link.short_code);
                return Err(e);
            }
        }

        let link = ShortLink {
            id: data.next_id(),
            user_id: new_link.user_id,
            title: new_link.title,
            original_url: new_link.original_url,
            short_code: new_link.short_code,
            custom_alias: new_link.custom_alias,
            created_at: Utc::now(),
        };
        data.links.push(link.clone());
        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.links.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.links.iter().find(|l| l.short_code == code).cloned())
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data
            .links
            .iter()
            .find(|l| l.custom_alias.as_deref() == Some(alias))
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let data = self.lock();
        data.check()?;
        let mut links: Vec<ShortLink> = data
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(links)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut data = self.lock();
        data.check()?;
        let Some(pos) = data.links.iter().position(|l| l.id == id) else {
            return Ok(false);
        };
        let link = data.links.remove(pos);
        for code in link.codes() {
            data.reserved.remove(code);
        }
        data.clicks.retain(|c| c.link_id != id);
        Ok(true)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.links.len() as i64)
    }
}

fn item_not_found(item_id: i64) -> AppError {
    AppError::not_found("Item not found", json!({ "id": item_id }))
}

#[async_trait]
impl LinkTreeRepository for MemoryStore {
    async fn create(&self, new_tree: NewLinkTree) -> Result<LinkTree, AppError> {
        let mut data = self.lock();
        data.check()?;
        data.reserve(&new_tree.short_code)?;
        let now = Utc::now();
        let tree = LinkTree {
            id: data.next_id(),
            user_id: new_tree.user_id,
            short_code: new_tree.short_code,
            title: new_tree.title,
            bio: new_tree.bio,
            avatar_url: new_tree.avatar_url,
            theme: new_tree.theme,
            created_at: now,
            updated_at: now,
        };
        data.linktrees.push(tree.clone());
        Ok(tree)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LinkTree>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.linktrees.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<LinkTree>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.linktrees.iter().find(|t| t.short_code == code).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<LinkTree>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.linktrees.iter().find(|t| t.user_id == user_id).cloned())
    }

    async fn update(&self, id: i64, patch: LinkTreePatch) -> Result<LinkTree, AppError> {
        let mut data = self.lock();
        data.check()?;
        let pos = data
            .linktrees
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("Linktree not found", json!({ "id": id })))?;

        if let Some(code) = &patch.short_code {
            let old = data.linktrees[pos].short_code.clone();
            if *code != old {
                data.reserve(code)?;
                data.reserved.remove(&old);
            }
        }

        let tree = &mut data.linktrees[pos];
        if let Some(code) = patch.short_code {
            tree.short_code = code;
        }
        if let Some(title) = patch.title {
            tree.title = title;
        }
        if let Some(bio) = patch.bio {
            tree.bio = Some(bio);
        }
        if let Some(avatar_url) = patch.avatar_url {
            tree.avatar_url = Some(avatar_url);
        }
        if let Some(theme) = patch.theme {
            tree.theme = theme;
        }
        tree.updated_at = Utc::now();
        Ok(tree.clone())
    }

    async fn list_items(
        &self,
        linktree_id: i64,
        active_only: bool,
    ) -> Result<Vec<LinkTreeItem>, AppError> {
        let data = self.lock();
        data.check()?;
        let mut items: Vec<LinkTreeItem> = data
            .items
            .iter()
            .filter(|i| i.linktree_id == linktree_id && (i.is_active || !active_only))
            .cloned()
            .collect();
        items.sort_by_key(|i| (i.order_index, i.id));
        Ok(items)
    }

    async fn find_item(&self, item_id: i64) -> Result<Option<LinkTreeItem>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.items.iter().find(|i| i.id == item_id).cloned())
    }

    async fn next_order_index(&self, linktree_id: i64) -> Result<i32, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data
            .items
            .iter()
            .filter(|i| i.linktree_id == linktree_id)
            .map(|i| i.order_index + 1)
            .max()
            .unwrap_or(0))
    }

    async fn add_item(&self, new_item: NewLinkTreeItem) -> Result<LinkTreeItem, AppError> {
        let mut data = self.lock();
        data.check()?;
        let item = LinkTreeItem {
            id: data.next_id(),
            linktree_id: new_item.linktree_id,
            title: new_item.title,
            url: new_item.url,
            icon: new_item.icon,
            order_index: new_item.order_index,
            is_active: true,
            created_at: Utc::now(),
        };
        data.items.push(item.clone());
        Ok(item)
    }

    async fn update_item(
        &self,
        item_id: i64,
        patch: LinkTreeItemPatch,
    ) -> Result<LinkTreeItem, AppError> {
        let mut data = self.lock();
        data.check()?;
        let item = data
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| item_not_found(item_id))?;

        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(url) = patch.url {
            item.url = url;
        }
        if let Some(icon) = patch.icon {
            item.icon = icon;
        }
        if let Some(is_active) = patch.is_active {
            item.is_active = is_active;
        }
        Ok(item.clone())
    }

    async fn delete_item(&self, item_id: i64) -> Result<bool, AppError> {
        let mut data = self.lock();
        data.check()?;
        let before = data.items.len();
        data.items.retain(|i| i.id != item_id);
        Ok(data.items.len() < before)
    }

    async fn reorder_items(
        &self,
        linktree_id: i64,
        ordered_ids: Vec<i64>,
    ) -> Result<(), AppError> {
        let mut data = self.lock();
        data.check()?;
        for (position, id) in ordered_ids.iter().enumerate() {
            if let Some(item) = data
                .items
                .iter_mut()
                .find(|i| i.id == *id && i.linktree_id == linktree_id)
            {
                item.order_index = position as i32;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StatsRepository for MemoryStore {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut data = self.lock();
        data.check()?;
        let click = Click {
            id: data.next_id(),
            link_id: new_click.link_id,
            city: new_click.details.city,
            country: new_click.details.country,
            device_type: new_click.details.device.as_str().to_string(),
            browser: new_click.details.browser,
            clicked_at: Utc::now(),
        };
        data.clicks.push(click.clone());
        Ok(click)
    }

    async fn record_view(&self, new_view: NewView) -> Result<View, AppError> {
        let mut data = self.lock();
        data.check()?;
        let view = View {
            id: data.next_id(),
            linktree_id: new_view.linktree_id,
            city: new_view.details.city,
            country: new_view.details.country,
            device_type: new_view.details.device.as_str().to_string(),
            browser: new_view.details.browser,
            viewed_at: Utc::now(),
        };
        data.views.push(view.clone());
        Ok(view)
    }

    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let data = self.lock();
        data.check()?;
        let mut clicks: Vec<Click> = data
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at).then(b.id.cmp(&a.id)));
        Ok(clicks)
    }

    async fn click_counts_for_user(&self, user_id: &str) -> Result<Vec<LinkClickCount>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| LinkClickCount {
                link_id: l.id,
                clicks: data.clicks.iter().filter(|c| c.link_id == l.id).count() as i64,
            })
            .collect())
    }

    async fn views_since(
        &self,
        linktree_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<View>, AppError> {
        let data = self.lock();
        data.check()?;
        let mut views: Vec<View> = data
            .views
            .iter()
            .filter(|v| v.linktree_id == linktree_id && v.viewed_at >= since)
            .cloned()
            .collect();
        views.sort_by_key(|v| v.viewed_at);
        Ok(views)
    }

    async fn count_clicks(&self) -> Result<i64, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.clicks.len() as i64)
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn validate_token(&self, token_hash: &str) -> Result<Option<String>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .map(|t| t.user_id.clone()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut data = self.lock();
        data.check()?;
        if let Some(token) = data.tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        name: &str,
        user_id: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let mut data = self.lock();
        data.check()?;
        let token = ApiToken {
            id: data.next_id(),
            name: name.to_string(),
            user_id: user_id.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        data.tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.tokens.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let data = self.lock();
        data.check()?;
        Ok(data.tokens.iter().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut data = self.lock();
        data.check()?;
        if let Some(token) = data.tokens.iter_mut().find(|t| t.id == id) {
            token.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}

// ─── App wiring ──────────────────────────────────────────────────────────────

/// Application state over a fresh [`MemoryStore`], plus the receiving end
/// of the visit queue so tests can see what would be recorded.
pub struct TestContext {
    pub state: AppState,
    pub store: MemoryStore,
    pub visits: mpsc::Receiver<VisitEvent>,
}

impl TestContext {
    pub fn server(&self) -> TestServer {
        TestServer::new(test_router(self.state.clone())).unwrap()
    }

    /// Drains every visit queued so far.
    pub fn queued_visits(&mut self) -> Vec<VisitEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.visits.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn create_test_state() -> TestContext {
    create_test_state_with(false)
}

pub fn create_test_state_with(behind_proxy: bool) -> TestContext {
    let store = MemoryStore::new();
    let (tx, visits) = mpsc::channel(64);
    let recorder = ClickRecorder::new(Arc::new(DedupWindow::default()), tx);

    let state = AppState::new(
        store.repositories(),
        Arc::new(NullCache::new()),
        recorder,
        StateOptions {
            public_base_url: PUBLIC_BASE_URL.to_string(),
            token_signing_secret: SIGNING_SECRET.to_string(),
            behind_proxy,
        },
    );

    TestContext {
        state,
        store,
        visits,
    }
}

/// The application's routes without rate limiting, with every request
/// arriving from [`peer`].
pub fn test_router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .merge(web::routes::public_routes())
        .route("/{code}", get(redirect_handler))
        .layer(MockConnectInfo(peer()))
        .with_state(state)
}

// ─── PostgreSQL helpers ──────────────────────────────────────────────────────

pub async fn insert_link(pool: &PgPool, user_id: &str, code: &str, url: &str) -> i64 {
    sqlx::query("INSERT INTO reserved_codes (code) VALUES ($1)")
        .bind(code)
        .execute(pool)
        .await
        .unwrap();

    sqlx::query_scalar(
        "INSERT INTO links (user_id, title, original_url, short_code)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user_id)
    .bind(format!("Link {code}"))
    .bind(url)
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn reserved_count(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM reserved_codes WHERE code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}
