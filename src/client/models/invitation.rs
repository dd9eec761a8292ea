//! Invitation models
//!
//! Invitations are not merged into the unified timeline; they render as a
//! parallel list inside the same aggregate view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the invitee is being invited to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationKind {
    Organization,
    Project,
}

/// Stored invitation state
///
/// `Expired` is derived, never stored: a pending invitation past its expiry
/// reports as expired via [`Invitation::effective_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

/// The invitee's response to an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationResponse {
    Accept,
    Reject,
}

impl InvitationResponse {
    /// Wire value for the respond endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationResponse::Accept => "accepted",
            InvitationResponse::Reject => "rejected",
        }
    }
}

/// An invitation to join an organization or project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    /// Invitation ID
    pub id: String,

    /// Inviting user's ID
    pub inviter_id: String,

    /// Inviting user's display name, filled in by a batched lookup
    #[serde(default)]
    pub inviter_name: Option<String>,

    /// Invitee email address
    pub invitee_email: String,

    /// Invitee user ID, if the address matched an account
    #[serde(default)]
    pub invitee_id: Option<String>,

    /// Organization or project invitation
    pub kind: InvitationKind,

    /// ID of the organization or project
    pub target_id: String,

    /// Display name of the target
    pub target_name: String,

    /// Stored state
    pub status: InvitationStatus,

    /// Optional message from the inviter
    #[serde(default)]
    pub message: Option<String>,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,

    /// When the invitation lapses
    pub expires_at: DateTime<Utc>,

    /// When the invitee responded, if they have
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,

    /// Optional message from the invitee's response
    #[serde(default)]
    pub response_message: Option<String>,
}

impl Invitation {
    /// Stored status with expiry derived: pending past `expires_at` is expired.
    pub fn effective_status(&self, now: DateTime<Utc>) -> InvitationStatus {
        if self.status == InvitationStatus::Pending && now > self.expires_at {
            InvitationStatus::Expired
        } else {
            self.status
        }
    }

    /// Whether the invitation can still be acted on
    pub fn is_actionable(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == InvitationStatus::Pending
    }
}
