//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules, and
//! give HTTP handlers a narrow API.
//!
//! # Available Services
//!
//! - [`services::Resolver`] - Code resolution with caching
//! - [`services::AliasService`] - Namespace availability and code generation
//! - [`services::LinkService`] - Short link management and QR codes
//! - [`services::LinkTreeService`] - Link-in-bio pages and items
//! - [`services::StatsService`] - Click and view analytics
//! - [`services::AuthService`] - API token authentication

pub mod services;
