//! HTML template rendering handlers.

mod home;
mod linktree;
pub(crate) mod not_found;

pub use home::home_handler;
pub use linktree::linktree_page_handler;
pub use not_found::not_found_page;
