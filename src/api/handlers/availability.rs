//! Handler for checking whether a code can be claimed.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::availability::AvailabilityResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::validate_custom_alias;

/// Reports whether `code` is free in every namespace.
///
/// # Endpoint
///
/// `GET /api/availability/{code}`
///
/// A malformed or reserved code is reported as unavailable with the
/// validation message as `reason`, rather than as a 400.
pub async fn availability_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    if let Err(e) = validate_custom_alias(&code) {
        return Ok(Json(AvailabilityResponse {
            code,
            available: false,
            reason: Some(e.to_string()),
        }));
    }

    let available = state.alias_service.validate_availability(&code).await?;

    Ok(Json(AvailabilityResponse {
        reason: (!available).then(|| crate::error::TAKEN_MESSAGE.to_string()),
        code,
        available,
    }))
}
