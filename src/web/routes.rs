//! Public HTML route configuration.

use crate::state::AppState;
use crate::web::handlers::{home_handler, linktree_page_handler};
use axum::{Router, routing::get};

/// Public pages; no authentication.
///
/// # Endpoints
///
/// - `GET /`        - Landing page
/// - `GET /lt/{id}` - Public linktree page (records a view)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/lt/{id}", get(linktree_page_handler))
}
