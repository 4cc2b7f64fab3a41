//! Helpers shared across layers.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`url_normalizer`] - URL normalization and sanitization
//! - [`icon`] - Social platform detection for linktree items
//! - [`user_agent`] - Device and browser classification
//! - [`client_ip`] - Visitor IP extraction

pub mod client_ip;
pub mod code_generator;
pub mod icon;
pub mod url_normalizer;
pub mod user_agent;
