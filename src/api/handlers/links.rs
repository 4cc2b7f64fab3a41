//! Handlers for short link endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkListResponse, LinkResponse};
use crate::application::services::AuthUser;
use crate::application::services::stats_service::LinkStats;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the authenticated user.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Docs",
///   "url": "https://example.com/docs",
///   "custom_alias": "my-docs"
/// }
/// ```
///
/// # Errors
///
/// - 400 for an invalid URL, title or alias
/// - 409 "This URL is already taken" when the alias is in use
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(
            &user.user_id,
            &payload.title,
            &payload.url,
            payload.custom_alias,
        )
        .await?;

    let short_url = state.link_service.short_url(&link);

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::new(link, short_url, Some(0))),
    ))
}

/// Lists the user's links, newest first, with click totals.
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_links(&user.user_id).await?;
    let totals = state.stats_service.click_totals(&user.user_id).await?;

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link);
            let clicks = totals.get(&link.id).copied().unwrap_or(0);
            LinkResponse::new(link, short_url, Some(clicks))
        })
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// `GET /api/links/{id}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&user.user_id, id).await?;
    let short_url = state.link_service.short_url(&link);

    Ok(Json(LinkResponse::new(link, short_url, None)))
}

/// Deletes a link together with its clicks.
///
/// `DELETE /api/links/{id}` returns 204 No Content.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&user.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Renders the link's short URL as an SVG QR code.
///
/// `GET /api/links/{id}/qr`
pub async fn link_qr_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.get_link(&user.user_id, id).await?;
    let svg = state.link_service.qr_svg(&link)?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

/// Click breakdowns by device, country and city.
///
/// `GET /api/links/{id}/stats`
pub async fn link_stats_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<LinkStats>, AppError> {
    let stats = state.stats_service.link_stats(&user.user_id, id).await?;

    Ok(Json(stats))
}
