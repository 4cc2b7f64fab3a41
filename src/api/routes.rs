//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    add_item_handler, availability_handler, create_link_handler, create_linktree_handler,
    delete_item_handler, delete_link_handler, get_link_handler, get_linktree_handler,
    link_qr_handler, link_stats_handler, linktree_analytics_handler, list_links_handler,
    reorder_items_handler, update_item_handler, update_linktree_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post, put},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /links`                 - Create a short link
/// - `GET    /links`                 - List the user's links with click totals
/// - `GET    /links/{id}`            - Fetch one link
/// - `DELETE /links/{id}`            - Delete a link
/// - `GET    /links/{id}/qr`         - SVG QR code of the short URL
/// - `GET    /links/{id}/stats`      - Click breakdowns
/// - `GET    /availability/{code}`   - Whether a code is free in every namespace
/// - `GET    /linktree`              - The user's page with all items
/// - `POST   /linktree`              - Create the page
/// - `PATCH  /linktree`              - Update title, bio, avatar, theme or code
/// - `POST   /linktree/items`        - Append an item
/// - `PUT    /linktree/items/order`  - Reorder items
/// - `PATCH  /linktree/items/{id}`   - Update an item
/// - `DELETE /linktree/items/{id}`   - Delete an item
/// - `GET    /linktree/analytics`    - View analytics (`?days=30`)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler).delete(delete_link_handler),
        )
        .route("/links/{id}/qr", get(link_qr_handler))
        .route("/links/{id}/stats", get(link_stats_handler))
        .route("/availability/{code}", get(availability_handler))
        .route(
            "/linktree",
            get(get_linktree_handler)
                .post(create_linktree_handler)
                .patch(update_linktree_handler),
        )
        .route("/linktree/items", post(add_item_handler))
        .route("/linktree/items/order", put(reorder_items_handler))
        .route(
            "/linktree/items/{id}",
            patch(update_item_handler).delete(delete_item_handler),
        )
        .route("/linktree/analytics", get(linktree_analytics_handler))
}
