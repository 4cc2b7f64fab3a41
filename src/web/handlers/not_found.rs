//! "Nothing here" page shared by redirects and linktree pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub heading: &'static str,
    pub message: String,
}

/// 404 page for a short code that matches nothing.
pub fn not_found_page(code: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            heading: "Link Not Found",
            message: format!("Nothing lives at /{code}. It may have been removed."),
        },
    )
        .into_response()
}

/// 404 page for a linktree id that matches nothing.
pub fn linktree_not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            heading: "Linktree Not Found",
            message: "This linktree doesn't exist or has been removed.".to_string(),
        },
    )
        .into_response()
}
