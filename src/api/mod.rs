//! JSON API for managing links and linktrees, plus the public redirect.
//!
//! Handlers translate requests into service calls on [`crate::state::AppState`]
//! and render [`crate::error::AppError`] as JSON.
//!
//! - [`dto`] - Request and response bodies
//! - [`handlers`] - Endpoint handlers, including `GET /{code}`
//! - [`middleware`] - Bearer auth, per-IP rate limiting, request tracing
//! - [`routes`] - Routes mounted under `/api`

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
