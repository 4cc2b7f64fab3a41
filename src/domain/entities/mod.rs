//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic. Creation inputs
//! use separate `New*` structs and partial updates use `*Patch` structs.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A code-to-destination mapping
//! - [`LinkTree`] / [`LinkTreeItem`] - A link-in-bio page and its entries
//! - [`Click`] / [`View`] - Visit analytics records

pub mod click;
pub mod link;
pub mod linktree;

pub use click::{Click, DeviceClass, NewClick, NewView, UNKNOWN, View, VisitDetails};
pub use link::{NewShortLink, ShortLink};
pub use linktree::{
    DEFAULT_THEME, LinkTree, LinkTreeItem, LinkTreeItemPatch, LinkTreePatch, NewLinkTree,
    NewLinkTreeItem, PublicLinkTree,
};
