//! DTO for the code availability endpoint.

use serde::Serialize;

/// Response for `GET /api/availability/{code}`.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub code: String,
    pub available: bool,
    /// Why the code cannot be used, when it cannot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
