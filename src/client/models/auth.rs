//! Authentication models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session token returned by the authentication endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    /// The session token string
    pub token: String,

    /// Token expiration time
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,

    /// Signed-in user ID
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Signed-in user email
    pub email: String,
}
