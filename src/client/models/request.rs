//! Join request models
//!
//! The same record shape backs both organization and project join requests;
//! which table a record came from is known from the endpoint that returned
//! it, not from the record itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review lifecycle state of a join request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Whether the request has been reviewed (approved or rejected)
    pub fn is_resolved(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// A reviewer's decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// The status the request transitions to under this decision
    pub fn resulting_status(&self) -> RequestStatus {
        match self {
            ReviewDecision::Approve => RequestStatus::Approved,
            ReviewDecision::Reject => RequestStatus::Rejected,
        }
    }

    /// Wire value for review endpoints
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Approve => "approved",
            ReviewDecision::Reject => "rejected",
        }
    }
}

/// A request to join an organization or project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Request ID (unique within its source table only)
    pub id: String,

    /// ID of the organization or project being joined
    pub target_id: String,

    /// Display name of the join target
    pub target_name: String,

    /// Requesting user's ID
    pub requester_id: String,

    /// Requesting user's display name
    pub requester_name: String,

    /// Requesting user's email
    pub requester_email: String,

    /// Optional message from the requester
    #[serde(default)]
    pub message: Option<String>,

    /// Review state
    pub status: RequestStatus,

    /// Read flag, settable only after the request leaves pending
    #[serde(default)]
    pub is_read: bool,

    /// When the request was created
    pub created_at: DateTime<Utc>,

    /// When the request was reviewed, if it has been
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}
