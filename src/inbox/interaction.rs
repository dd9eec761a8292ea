//! Unified interaction model
//!
//! Join requests and notifications come from different tables with different
//! shapes, but the inbox renders them as one timeline. The tagged union here
//! keeps each variant's status domain intact while giving the aggregator a
//! single type to merge, sort, and mutate.

use chrono::{DateTime, Utc};

use crate::client::models::{JoinRequest, Notification, RequestStatus};

/// Which backing table an interaction came from
///
/// Request IDs are only unique within their source table, so identity is
/// always the `(SourceKind, id)` pair, never the bare ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    OrgJoinRequest,
    ProjectJoinRequest,
    Notification,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SourceKind::OrgJoinRequest => "org-request",
            SourceKind::ProjectJoinRequest => "project-request",
            SourceKind::Notification => "notification",
        };
        write!(f, "{}", label)
    }
}

/// Whether the user received this interaction, initiated it, or got it from
/// the platform itself. Received/sent only carry meaning for join requests;
/// notifications are always system-directed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Received,
    Sent,
    System,
}

/// Identity of an interaction across reloads
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InteractionKey {
    pub kind: SourceKind,
    pub id: String,
}

impl InteractionKey {
    pub fn new(kind: SourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// The source record backing an interaction
#[derive(Debug, Clone)]
pub enum InteractionSource {
    OrgJoinRequest(JoinRequest),
    ProjectJoinRequest(JoinRequest),
    Notification(Notification),
}

/// One entry in the unified inbox timeline
#[derive(Debug, Clone)]
pub struct UnifiedInteraction {
    pub direction: Direction,
    pub source: InteractionSource,
}

impl UnifiedInteraction {
    pub fn received(source: InteractionSource) -> Self {
        Self {
            direction: Direction::Received,
            source,
        }
    }

    pub fn sent(source: InteractionSource) -> Self {
        Self {
            direction: Direction::Sent,
            source,
        }
    }

    pub fn system(source: InteractionSource) -> Self {
        Self {
            direction: Direction::System,
            source,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match &self.source {
            InteractionSource::OrgJoinRequest(_) => SourceKind::OrgJoinRequest,
            InteractionSource::ProjectJoinRequest(_) => SourceKind::ProjectJoinRequest,
            InteractionSource::Notification(_) => SourceKind::Notification,
        }
    }

    pub fn id(&self) -> &str {
        match &self.source {
            InteractionSource::OrgJoinRequest(r) | InteractionSource::ProjectJoinRequest(r) => {
                &r.id
            }
            InteractionSource::Notification(n) => &n.id,
        }
    }

    pub fn key(&self) -> InteractionKey {
        InteractionKey::new(self.kind(), self.id())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match &self.source {
            InteractionSource::OrgJoinRequest(r) | InteractionSource::ProjectJoinRequest(r) => {
                r.created_at
            }
            InteractionSource::Notification(n) => n.created_at,
        }
    }

    /// The org or project a join request targets, when this interaction is one
    pub fn target_id(&self) -> Option<&str> {
        match &self.source {
            InteractionSource::OrgJoinRequest(r) | InteractionSource::ProjectJoinRequest(r) => {
                Some(&r.target_id)
            }
            InteractionSource::Notification(_) => None,
        }
    }

    /// Join request status, when this interaction is one
    pub fn request_status(&self) -> Option<RequestStatus> {
        match &self.source {
            InteractionSource::OrgJoinRequest(r) | InteractionSource::ProjectJoinRequest(r) => {
                Some(r.status)
            }
            InteractionSource::Notification(_) => None,
        }
    }

    /// A received pending request is actionable (can be reviewed)
    pub fn is_reviewable(&self) -> bool {
        self.direction == Direction::Received
            && self.request_status() == Some(RequestStatus::Pending)
    }

    pub fn is_read(&self) -> bool {
        match &self.source {
            InteractionSource::OrgJoinRequest(r) | InteractionSource::ProjectJoinRequest(r) => {
                r.is_read
            }
            InteractionSource::Notification(n) => n.is_read,
        }
    }

    /// The read flag on requests only applies once they leave pending;
    /// notifications can always be marked.
    pub fn is_markable_read(&self) -> bool {
        match &self.source {
            InteractionSource::OrgJoinRequest(r) | InteractionSource::ProjectJoinRequest(r) => {
                r.status.is_resolved()
            }
            InteractionSource::Notification(_) => true,
        }
    }

    /// Notifications are always deletable; join requests only once reviewed.
    /// A pending request is never deletable, so an actionable item cannot be
    /// silently discarded.
    pub fn is_deletable(&self) -> bool {
        match &self.source {
            InteractionSource::OrgJoinRequest(r) | InteractionSource::ProjectJoinRequest(r) => {
                r.status.is_resolved()
            }
            InteractionSource::Notification(_) => true,
        }
    }

    /// Force the read flag on (local optimistic overlay)
    pub fn apply_read(&mut self) {
        match &mut self.source {
            InteractionSource::OrgJoinRequest(r) | InteractionSource::ProjectJoinRequest(r) => {
                r.is_read = true;
            }
            InteractionSource::Notification(n) => n.is_read = true,
        }
    }

    /// Short display line for the item
    pub fn summary(&self) -> String {
        match &self.source {
            InteractionSource::OrgJoinRequest(r) => match self.direction {
                Direction::Received => {
                    format!("{} requested to join {}", r.requester_name, r.target_name)
                }
                Direction::Sent | Direction::System => {
                    format!("You requested to join {}", r.target_name)
                }
            },
            InteractionSource::ProjectJoinRequest(r) => format!(
                "{} requested to join project {}",
                r.requester_name, r.target_name
            ),
            InteractionSource::Notification(n) => n.title.clone(),
        }
    }
}
