//! Handlers for the authenticated user's linktree.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::linktree::{
    AnalyticsQuery, CreateItemRequest, CreateLinkTreeRequest, LinkTreeResponse,
    ReorderItemsRequest, UpdateItemRequest, UpdateLinkTreeRequest,
};
use crate::application::services::AuthUser;
use crate::application::services::stats_service::LinkTreeAnalytics;
use crate::domain::entities::{LinkTree, LinkTreeItem, PublicLinkTree};
use crate::error::AppError;
use crate::state::AppState;

fn tree_response(state: &AppState, page: PublicLinkTree) -> LinkTreeResponse {
    let public_url = state.link_service.public_url(&page.tree.short_code);

    LinkTreeResponse {
        tree: page.tree,
        public_url,
        items: page.items,
    }
}

fn bare_tree_response(state: &AppState, tree: LinkTree) -> LinkTreeResponse {
    tree_response(
        state,
        PublicLinkTree {
            tree,
            items: Vec::new(),
        },
    )
}

/// The user's page with every item, including hidden ones.
///
/// `GET /api/linktree`
pub async fn get_linktree_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LinkTreeResponse>, AppError> {
    let page = state.linktree_service.get_for_user(&user.user_id).await?;

    Ok(Json(tree_response(&state, page)))
}

/// Creates the user's page.
///
/// `POST /api/linktree`
///
/// # Errors
///
/// - 409 if the user already has a page or the short code is taken
pub async fn create_linktree_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateLinkTreeRequest>,
) -> Result<(StatusCode, Json<LinkTreeResponse>), AppError> {
    payload.validate()?;

    let tree = state
        .linktree_service
        .create(&user.user_id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(bare_tree_response(&state, tree))))
}

/// `PATCH /api/linktree`
pub async fn update_linktree_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateLinkTreeRequest>,
) -> Result<Json<LinkTreeResponse>, AppError> {
    payload.validate()?;

    state
        .linktree_service
        .update(&user.user_id, payload.into())
        .await?;
    let page = state.linktree_service.get_for_user(&user.user_id).await?;

    Ok(Json(tree_response(&state, page)))
}

/// Appends an item to the user's page.
///
/// `POST /api/linktree/items`
pub async fn add_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<LinkTreeItem>), AppError> {
    payload.validate()?;

    let item = state
        .linktree_service
        .add_item(&user.user_id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// `PATCH /api/linktree/items/{id}`
pub async fn update_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<LinkTreeItem>, AppError> {
    payload.validate()?;

    let item = state
        .linktree_service
        .update_item(&user.user_id, id, payload.into())
        .await?;

    Ok(Json(item))
}

/// `DELETE /api/linktree/items/{id}`
pub async fn delete_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.linktree_service.delete_item(&user.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Reorders the page's items; the body must list every item exactly once.
///
/// `PUT /api/linktree/items/order`
pub async fn reorder_items_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ReorderItemsRequest>,
) -> Result<Json<Vec<LinkTreeItem>>, AppError> {
    let items = state
        .linktree_service
        .reorder_items(&user.user_id, payload.item_ids)
        .await?;

    Ok(Json(items))
}

/// View analytics for the last `days` days (default 30).
///
/// `GET /api/linktree/analytics?days=7`
pub async fn linktree_analytics_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<LinkTreeAnalytics>, AppError> {
    let analytics = state
        .stats_service
        .linktree_analytics(&user.user_id, query.days)
        .await?;

    Ok(Json(analytics))
}
