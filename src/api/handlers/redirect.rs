//! Handler for short code redirects.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use std::net::SocketAddr;

use crate::api::handlers::visitor_from_request;
use crate::domain::click_event::Visitor;
use crate::domain::click_recorder::{ClickRecorder, RecordOutcome};
use crate::domain::resolution::{Resolution, ResolvedLink};
use crate::error::AppError;
use crate::state::AppState;
use crate::web::handlers::not_found_page;

/// Resolves a visited code and sends the visitor on.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Responses
///
/// - **307** to `/lt/{id}` when the code belongs to a linktree
/// - **307** to the destination when it belongs to a short link; a click is
///   recorded on the way out
/// - **404** HTML page with a link home when nothing matches
/// - **503** when the lookup itself failed
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let response = match state.resolver.resolve(&code).await? {
        Resolution::LinkTree { id } => Redirect::temporary(&format!("/lt/{id}")).into_response(),
        Resolution::ShortLink(link) => {
            let visitor = visitor_from_request(&headers, addr, state.behind_proxy);
            record_and_redirect(&state.recorder, &link, visitor).into_response()
        }
        Resolution::NotFound => not_found_page(&code),
    };

    Ok(response)
}

/// Records a click on `link` and redirects to its destination.
///
/// Exactly one redirect is produced whatever the recorder reports; recording
/// failures are logged and otherwise ignored.
pub fn record_and_redirect(
    recorder: &ClickRecorder,
    link: &ResolvedLink,
    visitor: Visitor,
) -> Redirect {
    match recorder.record_click(link.id, visitor) {
        Ok(RecordOutcome::Queued) => {}
        Ok(RecordOutcome::Suppressed) => {
            tracing::debug!(link_id = link.id, "Click not recorded: duplicate");
        }
        Err(e) => {
            tracing::warn!(link_id = link.id, error = %e, "Click not recorded");
        }
    }

    Redirect::temporary(&link.destination)
}
