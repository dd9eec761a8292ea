//! Notification models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification category
///
/// Invitation-kind notifications duplicate records surfaced by the
/// invitation list and are filtered out of the unified timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Invitation,
    RequestApproved,
    RequestRejected,
    Mention,
    System,
    #[serde(other)]
    Other,
}

impl NotificationKind {
    /// Whether this notification mirrors an invitation record
    pub fn is_invitation(&self) -> bool {
        matches!(self, NotificationKind::Invitation)
    }
}

/// A notification addressed to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification ID
    pub id: String,

    /// Recipient user ID
    pub user_id: String,

    /// Notification category
    pub kind: NotificationKind,

    /// Short headline
    pub title: String,

    /// Optional body text
    #[serde(default)]
    pub body: Option<String>,

    /// Read flag (one-way: unread to read)
    #[serde(default)]
    pub is_read: bool,

    /// When the notification was created
    pub created_at: DateTime<Utc>,
}
