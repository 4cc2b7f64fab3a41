//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces, and the visit pipeline,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`codespace`] - The shared code namespace and its ordered probes
//! - [`resolution`] - What a visited code resolves to
//! - [`dedup`] - Short-window click suppression
//! - [`click_event`] - Visit event model
//! - [`click_recorder`] - Visit admission and handoff
//! - [`click_worker`] - Asynchronous visit processing
//! - [`geo`] - IP geolocation contract
//!
//! # Visit Flow
//!
//! 1. The redirect handler resolves a code via
//!    [`crate::application::services::Resolver`]
//! 2. [`click_recorder::ClickRecorder`] checks the dedup window and enqueues a
//!    [`click_event::VisitEvent`] without waiting
//! 3. The handler answers with a redirect regardless of step 2
//! 4. [`click_worker::run_visit_worker`] classifies, geolocates and persists
//!    the visit via [`repositories::StatsRepository`]

pub mod click_event;
pub mod click_recorder;
pub mod click_worker;
pub mod codespace;
pub mod dedup;
pub mod entities;
pub mod geo;
pub mod repositories;
pub mod resolution;
