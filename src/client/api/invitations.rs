//! Invitation API trait

use async_trait::async_trait;

use crate::client::models::{Invitation, InvitationResponse};
use crate::error::Result;

/// Invitation operations
#[async_trait]
pub trait InvitationApi: Send + Sync {
    /// List invitations addressed to the user, matched by email or user ID
    async fn list_invitations_received(
        &self,
        email: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<Invitation>>;

    /// List invitations the user has sent
    async fn list_invitations_sent(&self, user_id: &str) -> Result<Vec<Invitation>>;

    /// Accept or reject an invitation
    async fn respond_to_invitation(
        &self,
        invitation_id: &str,
        response: InvitationResponse,
        message: Option<&str>,
    ) -> Result<()>;
}
