//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod availability;
pub mod health;
pub mod links;
pub mod linktree;
pub mod redirect;

use std::net::SocketAddr;

use axum::http::{HeaderMap, header};

use crate::domain::click_event::Visitor;
use crate::utils::client_ip::client_ip;

pub use availability::availability_handler;
pub use health::health_handler;
pub use links::{
    create_link_handler, delete_link_handler, get_link_handler, link_qr_handler,
    link_stats_handler, list_links_handler,
};
pub use linktree::{
    add_item_handler, create_linktree_handler, delete_item_handler, get_linktree_handler,
    linktree_analytics_handler, reorder_items_handler, update_item_handler,
    update_linktree_handler,
};
pub use redirect::{record_and_redirect, redirect_handler};

/// The visitor attributes recorded with a click or view.
pub fn visitor_from_request(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> Visitor {
    Visitor::new(
        client_ip(headers, Some(peer), behind_proxy),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
    )
}
