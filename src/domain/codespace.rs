//! The flat code namespace shared by short links and link-in-bio pages.
//!
//! Three fields across two entity types draw from one namespace: a link's
//! generated short code, a link's custom alias, and a linktree's short code.
//! Both resolution and availability checks walk an explicit, ordered list of
//! [`Namespace`] probes instead of relying on call order.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{LinkTree, ShortLink};
use crate::domain::repositories::{LinkRepository, LinkTreeRepository};
use crate::error::AppError;

/// One field that draws from the shared code namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    LinkTreeCode,
    ShortLinkCode,
    ShortLinkAlias,
}

impl Namespace {
    /// Every namespace a new code must be absent from.
    pub const ALL: [Namespace; 3] = [
        Namespace::LinkTreeCode,
        Namespace::ShortLinkCode,
        Namespace::ShortLinkAlias,
    ];

    /// Lookup priority for visits: a linktree always shadows a short link.
    pub const RESOLUTION_ORDER: [Namespace; 3] = [
        Namespace::LinkTreeCode,
        Namespace::ShortLinkCode,
        Namespace::ShortLinkAlias,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::LinkTreeCode => "linktree_code",
            Namespace::ShortLinkCode => "short_link_code",
            Namespace::ShortLinkAlias => "short_link_alias",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record found under a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupant {
    LinkTree(LinkTree),
    ShortLink(ShortLink),
}

/// Probes the shared namespace through the link and linktree repositories.
#[derive(Clone)]
pub struct Codespace {
    links: Arc<dyn LinkRepository>,
    linktrees: Arc<dyn LinkTreeRepository>,
}

impl Codespace {
    pub fn new(links: Arc<dyn LinkRepository>, linktrees: Arc<dyn LinkTreeRepository>) -> Self {
        Self { links, linktrees }
    }

    /// Looks `code` up in a single namespace.
    pub async fn probe(&self, namespace: Namespace, code: &str) -> Result<Option<Occupant>, AppError> {
        let occupant = match namespace {
            Namespace::LinkTreeCode => self
                .linktrees
                .find_by_short_code(code)
                .await?
                .map(Occupant::LinkTree),
            Namespace::ShortLinkCode => self
                .links
                .find_by_short_code(code)
                .await?
                .map(Occupant::ShortLink),
            Namespace::ShortLinkAlias => self
                .links
                .find_by_alias(code)
                .await?
                .map(Occupant::ShortLink),
        };

        Ok(occupant)
    }

    /// Probes namespaces in `order` and stops at the first hit.
    ///
    /// # Errors
    ///
    /// Propagates the first lookup failure; later namespaces are not probed.
    pub async fn first_match(
        &self,
        order: &[Namespace],
        code: &str,
    ) -> Result<Option<(Namespace, Occupant)>, AppError> {
        for &namespace in order {
            if let Some(occupant) = self.probe(namespace, code).await? {
                return Ok(Some((namespace, occupant)));
            }
        }

        Ok(None)
    }
}
