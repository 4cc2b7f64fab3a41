//! Outcome of resolving a visited short code.

use serde::{Deserialize, Serialize};

use crate::domain::codespace::Occupant;

/// The subset of a short link needed to redirect a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub id: i64,
    pub destination: String,
}

/// Exactly one of: a link-in-bio page, a redirect target, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    LinkTree { id: i64 },
    ShortLink(ResolvedLink),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        !matches!(self, Resolution::NotFound)
    }
}

impl From<Occupant> for Resolution {
    fn from(occupant: Occupant) -> Self {
        match occupant {
            Occupant::LinkTree(tree) => Resolution::LinkTree { id: tree.id },
            Occupant::ShortLink(link) => Resolution::ShortLink(ResolvedLink {
                id: link.id,
                destination: link.original_url,
            }),
        }
    }
}
