//! Public link-in-bio page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::api::handlers::visitor_from_request;
use crate::domain::entities::{LinkTreeItem, PublicLinkTree};
use crate::error::AppError;
use crate::state::AppState;
use crate::web::handlers::not_found::linktree_not_found_page;

#[derive(Template, WebTemplate)]
#[template(path = "linktree.html")]
pub struct LinkTreeTemplate {
    pub title: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub theme: String,
    pub items: Vec<LinkTreeItem>,
}

impl From<PublicLinkTree> for LinkTreeTemplate {
    fn from(page: PublicLinkTree) -> Self {
        Self {
            title: page.tree.title,
            bio: page.tree.bio,
            avatar_url: page.tree.avatar_url,
            theme: page.tree.theme,
            items: page.items,
        }
    }
}

/// Renders a linktree with its active items and records a view.
///
/// # Endpoint
///
/// `GET /lt/{id}`
///
/// An unknown id renders the 404 page; any other failure is an API error.
pub async fn linktree_page_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let page = match state.linktree_service.public_page(id).await {
        Ok(page) => page,
        Err(AppError::NotFound { .. }) => return Ok(linktree_not_found_page()),
        Err(e) => return Err(e),
    };

    let visitor = visitor_from_request(&headers, addr, state.behind_proxy);
    if let Err(e) = state.recorder.record_view(page.tree.id, visitor) {
        tracing::warn!(linktree_id = page.tree.id, error = %e, "View not recorded");
    }

    Ok(LinkTreeTemplate::from(page).into_response())
}
