//! Visit event model for asynchronous analytics recording.

/// Request metadata captured at the moment of a visit.
///
/// Both fields are optional so missing headers or a missing peer address
/// never block a redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visitor {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl Visitor {
    pub fn new(ip: Option<String>, user_agent: Option<&str>) -> Self {
        Self {
            ip,
            user_agent: user_agent.map(str::to_string),
        }
    }
}

/// A visit queued for the background worker.
///
/// Created by [`crate::domain::click_recorder::ClickRecorder`] after the
/// dedup window admitted it, consumed by
/// [`crate::domain::click_worker::run_visit_worker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitEvent {
    /// A redirect through a short link.
    Click { link_id: i64, visitor: Visitor },
    /// A render of a public linktree page.
    View { linktree_id: i64, visitor: Visitor },
}

impl VisitEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            VisitEvent::Click { .. } => "click",
            VisitEvent::View { .. } => "view",
        }
    }

    pub fn target_id(&self) -> i64 {
        match self {
            VisitEvent::Click { link_id, .. } => *link_id,
            VisitEvent::View { linktree_id, .. } => *linktree_id,
        }
    }

    pub fn visitor(&self) -> &Visitor {
        match self {
            VisitEvent::Click { visitor, .. } | VisitEvent::View { visitor, .. } => visitor,
        }
    }
}
