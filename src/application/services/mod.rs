//! Business logic services for the application layer.

pub mod alias_service;
pub mod auth_service;
pub mod link_service;
pub mod linktree_service;
pub mod resolver;
pub mod stats_service;

pub use alias_service::AliasService;
pub use auth_service::{AuthService, AuthUser};
pub use link_service::LinkService;
pub use linktree_service::{ItemDraft, LinkTreeDraft, LinkTreeService};
pub use resolver::Resolver;
pub use stats_service::StatsService;
