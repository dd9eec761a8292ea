//! Join request API trait

use async_trait::async_trait;

use crate::client::models::{JoinRequest, ReviewDecision};
use crate::error::Result;

/// Join request listing and review operations
///
/// Organization and project requests live in different tables behind
/// different endpoints; "sent" and "received" are different query shapes
/// against the same tables.
#[async_trait]
pub trait RequestApi: Send + Sync {
    /// List join requests against one organization
    async fn list_org_join_requests(&self, org_id: &str) -> Result<Vec<JoinRequest>>;

    /// List join requests the user has sent (organization and project)
    async fn list_sent_join_requests(&self, user_id: &str) -> Result<Vec<JoinRequest>>;

    /// List project join requests for projects the user manages
    async fn list_project_join_requests_managed_by(
        &self,
        user_id: &str,
    ) -> Result<Vec<JoinRequest>>;

    /// Approve or reject an organization join request
    async fn review_org_join_request(
        &self,
        request_id: &str,
        decision: ReviewDecision,
        reviewer_id: &str,
    ) -> Result<()>;

    /// Approve or reject a project join request
    async fn review_project_join_request(
        &self,
        request_id: &str,
        decision: ReviewDecision,
        reviewer_id: &str,
    ) -> Result<()>;

    /// Flag a reviewed request as read
    async fn mark_join_request_read(&self, request_id: &str) -> Result<()>;

    /// Delete a batch of organization join requests in one call
    async fn delete_org_join_requests(&self, ids: &[String]) -> Result<()>;

    /// Delete a batch of project join requests in one call
    async fn delete_project_join_requests(&self, ids: &[String]) -> Result<()>;
}
