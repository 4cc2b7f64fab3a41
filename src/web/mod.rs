//! Server-rendered HTML pages.
//!
//! Uses Askama templates from `templates/`.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`routes`] - Public page routes

pub mod handlers;
pub mod routes;
