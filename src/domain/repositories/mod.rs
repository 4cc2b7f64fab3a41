//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link storage
//! - [`LinkTreeRepository`] - Link-in-bio pages and their items
//! - [`StatsRepository`] - Click and view recording and queries
//! - [`TokenRepository`] - API token authentication

pub mod link_repository;
pub mod linktree_repository;
pub mod stats_repository;
pub mod token_repository;

pub use link_repository::LinkRepository;
pub use linktree_repository::LinkTreeRepository;
pub use stats_repository::{LinkClickCount, StatsRepository};
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use linktree_repository::MockLinkTreeRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
