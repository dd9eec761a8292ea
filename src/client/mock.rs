//! Mock Crewdeck API client for testing
//!
//! Provides a mock implementation of the API traits for unit testing
//! without making real API calls. Mutations behave like the real backend:
//! reviewing a request flips its status and notifies the requester, so
//! end-to-end aggregation scenarios can be exercised in-process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::api::{AuthApi, DirectoryApi, InvitationApi, NotificationApi, RequestApi};
use super::models::notification::NotificationKind;
use super::models::{
    Invitation, InvitationResponse, InvitationStatus, JoinRequest, Notification, Organization,
    Project, ReviewDecision, SessionToken, Task, UserSummary,
};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure state via builder methods, then use in tests. Errors can be
/// injected per method name and are consumed on first use.
///
/// # Example
/// ```ignore
/// let mock = MockCollabClient::new()
///     .with_notifications(vec![notification("n-1", false)])
///     .with_error_on("list_notifications", ApiError::Network("down".into()));
/// ```
pub struct MockCollabClient {
    orgs: Arc<Mutex<Vec<Organization>>>,
    orgs_administered: Arc<Mutex<Vec<Organization>>>,
    projects: Arc<Mutex<Vec<Project>>>,
    tasks: Arc<Mutex<Vec<Task>>>,
    users: Arc<Mutex<Vec<UserSummary>>>,
    /// Org join requests; the owning org is the request's `target_id`
    org_requests: Arc<Mutex<Vec<JoinRequest>>>,
    /// Project join requests managed by the queried user
    project_requests: Arc<Mutex<Vec<JoinRequest>>>,
    /// Requests sent by the queried user
    sent_requests: Arc<Mutex<Vec<JoinRequest>>>,
    notifications: Arc<Mutex<Vec<Notification>>>,
    invitations_received: Arc<Mutex<Vec<Invitation>>>,
    invitations_sent: Arc<Mutex<Vec<Invitation>>>,
    /// Per-method errors, consumed on first use
    errors: Arc<Mutex<HashMap<&'static str, ApiError>>>,
    /// Track number of calls for verification
    call_counts: Arc<Mutex<CallCounts>>,
}

impl Default for MockCollabClient {
    fn default() -> Self {
        Self {
            orgs: Arc::new(Mutex::new(Vec::new())),
            orgs_administered: Arc::new(Mutex::new(Vec::new())),
            projects: Arc::new(Mutex::new(Vec::new())),
            tasks: Arc::new(Mutex::new(Vec::new())),
            users: Arc::new(Mutex::new(Vec::new())),
            org_requests: Arc::new(Mutex::new(Vec::new())),
            project_requests: Arc::new(Mutex::new(Vec::new())),
            sent_requests: Arc::new(Mutex::new(Vec::new())),
            notifications: Arc::new(Mutex::new(Vec::new())),
            invitations_received: Arc::new(Mutex::new(Vec::new())),
            invitations_sent: Arc::new(Mutex::new(Vec::new())),
            errors: Arc::new(Mutex::new(HashMap::new())),
            call_counts: Arc::new(Mutex::new(CallCounts::default())),
        }
    }
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub authenticate: usize,
    pub list_orgs_administered: usize,
    pub list_org_join_requests: usize,
    pub list_sent_join_requests: usize,
    pub list_project_join_requests: usize,
    pub list_notifications: usize,
    pub list_invitations_received: usize,
    pub list_invitations_sent: usize,
    pub lookup_users_by_ids: usize,
    pub review_org_join_request: usize,
    pub review_project_join_request: usize,
    pub mark_join_request_read: usize,
    pub mark_notification_read: usize,
    pub delete_notification: usize,
    pub delete_notifications: usize,
    pub delete_org_join_requests: usize,
    pub delete_project_join_requests: usize,
    pub respond_to_invitation: usize,
}

impl MockCollabClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orgs_administered(self, orgs: Vec<Organization>) -> Self {
        *self.orgs_administered.try_lock().unwrap() = orgs;
        self
    }

    pub fn with_org_requests(self, requests: Vec<JoinRequest>) -> Self {
        *self.org_requests.try_lock().unwrap() = requests;
        self
    }

    pub fn with_project_requests(self, requests: Vec<JoinRequest>) -> Self {
        *self.project_requests.try_lock().unwrap() = requests;
        self
    }

    pub fn with_sent_requests(self, requests: Vec<JoinRequest>) -> Self {
        *self.sent_requests.try_lock().unwrap() = requests;
        self
    }

    pub fn with_notifications(self, notifications: Vec<Notification>) -> Self {
        *self.notifications.try_lock().unwrap() = notifications;
        self
    }

    pub fn with_invitations_received(self, invitations: Vec<Invitation>) -> Self {
        *self.invitations_received.try_lock().unwrap() = invitations;
        self
    }

    pub fn with_invitations_sent(self, invitations: Vec<Invitation>) -> Self {
        *self.invitations_sent.try_lock().unwrap() = invitations;
        self
    }

    pub fn with_users(self, users: Vec<UserSummary>) -> Self {
        *self.users.try_lock().unwrap() = users;
        self
    }

    pub fn with_orgs(self, orgs: Vec<Organization>) -> Self {
        *self.orgs.try_lock().unwrap() = orgs;
        self
    }

    pub fn with_projects(self, projects: Vec<Project>) -> Self {
        *self.projects.try_lock().unwrap() = projects;
        self
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        *self.tasks.try_lock().unwrap() = tasks;
        self
    }

    /// Inject an error returned by the next call to `method`
    pub fn with_error_on(self, method: &'static str, error: ApiError) -> Self {
        self.errors.try_lock().unwrap().insert(method, error);
        self
    }

    /// Add a notification after construction, simulating out-of-band change
    pub async fn seed_notification(&self, notification: Notification) {
        self.notifications.lock().await.push(notification);
    }

    /// Get a snapshot of call counts
    pub async fn call_counts(&self) -> CallCounts {
        self.call_counts.lock().await.clone()
    }

    /// Current notifications (for asserting side effects of review)
    pub async fn notifications_snapshot(&self) -> Vec<Notification> {
        self.notifications.lock().await.clone()
    }

    /// Current org join requests (for asserting deletions)
    pub async fn org_requests_snapshot(&self) -> Vec<JoinRequest> {
        self.org_requests.lock().await.clone()
    }

    /// Current project join requests (for asserting deletions)
    pub async fn project_requests_snapshot(&self) -> Vec<JoinRequest> {
        self.project_requests.lock().await.clone()
    }

    async fn take_error(&self, method: &'static str) -> Option<ApiError> {
        self.errors.lock().await.remove(method)
    }
}

#[async_trait]
impl AuthApi for MockCollabClient {
    async fn authenticate(&self, _api_key: &str) -> Result<SessionToken> {
        self.call_counts.lock().await.authenticate += 1;
        if let Some(err) = self.take_error("authenticate").await {
            return Err(err.into());
        }
        Ok(SessionToken {
            token: "mock-session".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
            user_id: "user-1".to_string(),
            email: "user@example.com".to_string(),
        })
    }
}

#[async_trait]
impl DirectoryApi for MockCollabClient {
    async fn get_org(&self, org_id: &str) -> Result<Organization> {
        if let Some(err) = self.take_error("get_org").await {
            return Err(err.into());
        }
        self.orgs
            .lock()
            .await
            .iter()
            .find(|o| o.id == org_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Organization {}", org_id)).into())
    }

    async fn list_user_orgs(&self, _user_id: &str) -> Result<Vec<Organization>> {
        if let Some(err) = self.take_error("list_user_orgs").await {
            return Err(err.into());
        }
        Ok(self.orgs.lock().await.clone())
    }

    async fn list_orgs_administered(&self, _user_id: &str) -> Result<Vec<Organization>> {
        self.call_counts.lock().await.list_orgs_administered += 1;
        if let Some(err) = self.take_error("list_orgs_administered").await {
            return Err(err.into());
        }
        Ok(self.orgs_administered.lock().await.clone())
    }

    async fn list_projects(&self, org_id: &str, _user_id: &str) -> Result<Vec<Project>> {
        if let Some(err) = self.take_error("list_projects").await {
            return Err(err.into());
        }
        Ok(self
            .projects
            .lock()
            .await
            .iter()
            .filter(|p| p.organization_id == org_id)
            .cloned()
            .collect())
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        if let Some(err) = self.take_error("list_tasks").await {
            return Err(err.into());
        }
        Ok(self
            .tasks
            .lock()
            .await
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn lookup_users_by_ids(&self, ids: &[String]) -> Result<Vec<UserSummary>> {
        self.call_counts.lock().await.lookup_users_by_ids += 1;
        if let Some(err) = self.take_error("lookup_users_by_ids").await {
            return Err(err.into());
        }
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RequestApi for MockCollabClient {
    async fn list_org_join_requests(&self, org_id: &str) -> Result<Vec<JoinRequest>> {
        self.call_counts.lock().await.list_org_join_requests += 1;
        if let Some(err) = self.take_error("list_org_join_requests").await {
            return Err(err.into());
        }
        Ok(self
            .org_requests
            .lock()
            .await
            .iter()
            .filter(|r| r.target_id == org_id)
            .cloned()
            .collect())
    }

    async fn list_sent_join_requests(&self, user_id: &str) -> Result<Vec<JoinRequest>> {
        self.call_counts.lock().await.list_sent_join_requests += 1;
        if let Some(err) = self.take_error("list_sent_join_requests").await {
            return Err(err.into());
        }
        Ok(self
            .sent_requests
            .lock()
            .await
            .iter()
            .filter(|r| r.requester_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_project_join_requests_managed_by(
        &self,
        _user_id: &str,
    ) -> Result<Vec<JoinRequest>> {
        self.call_counts.lock().await.list_project_join_requests += 1;
        if let Some(err) = self.take_error("list_project_join_requests").await {
            return Err(err.into());
        }
        Ok(self.project_requests.lock().await.clone())
    }

    async fn review_org_join_request(
        &self,
        request_id: &str,
        decision: ReviewDecision,
        _reviewer_id: &str,
    ) -> Result<()> {
        self.call_counts.lock().await.review_org_join_request += 1;
        if let Some(err) = self.take_error("review_org_join_request").await {
            return Err(err.into());
        }
        let requester = {
            let mut requests = self.org_requests.lock().await;
            let request = requests
                .iter_mut()
                .find(|r| r.id == request_id)
                .ok_or_else(|| ApiError::NotFound(format!("Request {}", request_id)))?;
            request.status = decision.resulting_status();
            request.reviewed_at = Some(Utc::now());
            request.requester_id.clone()
        };

        // Approval cascades: the requester gets notified
        self.push_review_notification(&requester, decision).await;
        Ok(())
    }

    async fn review_project_join_request(
        &self,
        request_id: &str,
        decision: ReviewDecision,
        _reviewer_id: &str,
    ) -> Result<()> {
        self.call_counts.lock().await.review_project_join_request += 1;
        if let Some(err) = self.take_error("review_project_join_request").await {
            return Err(err.into());
        }
        let requester = {
            let mut requests = self.project_requests.lock().await;
            let request = requests
                .iter_mut()
                .find(|r| r.id == request_id)
                .ok_or_else(|| ApiError::NotFound(format!("Request {}", request_id)))?;
            request.status = decision.resulting_status();
            request.reviewed_at = Some(Utc::now());
            request.requester_id.clone()
        };

        self.push_review_notification(&requester, decision).await;
        Ok(())
    }

    async fn mark_join_request_read(&self, request_id: &str) -> Result<()> {
        self.call_counts.lock().await.mark_join_request_read += 1;
        if let Some(err) = self.take_error("mark_join_request_read").await {
            return Err(err.into());
        }
        for store in [&self.org_requests, &self.project_requests, &self.sent_requests] {
            let mut requests = store.lock().await;
            if let Some(request) = requests.iter_mut().find(|r| r.id == request_id) {
                // Server rule: read flag only applies after review
                if request.status.is_resolved() {
                    request.is_read = true;
                }
                return Ok(());
            }
        }
        Err(ApiError::NotFound(format!("Request {}", request_id)).into())
    }

    async fn delete_org_join_requests(&self, ids: &[String]) -> Result<()> {
        self.call_counts.lock().await.delete_org_join_requests += 1;
        if let Some(err) = self.take_error("delete_org_join_requests").await {
            return Err(err.into());
        }
        self.org_requests
            .lock()
            .await
            .retain(|r| !ids.contains(&r.id));
        Ok(())
    }

    async fn delete_project_join_requests(&self, ids: &[String]) -> Result<()> {
        self.call_counts.lock().await.delete_project_join_requests += 1;
        if let Some(err) = self.take_error("delete_project_join_requests").await {
            return Err(err.into());
        }
        self.project_requests
            .lock()
            .await
            .retain(|r| !ids.contains(&r.id));
        Ok(())
    }
}

impl MockCollabClient {
    async fn push_review_notification(&self, requester_id: &str, decision: ReviewDecision) {
        let (kind, title) = match decision {
            ReviewDecision::Approve => (
                NotificationKind::RequestApproved,
                "Your join request was approved",
            ),
            ReviewDecision::Reject => (
                NotificationKind::RequestRejected,
                "Your join request was rejected",
            ),
        };
        let mut notifications = self.notifications.lock().await;
        let id = format!("n-review-{}", notifications.len() + 1);
        notifications.push(Notification {
            id,
            user_id: requester_id.to_string(),
            kind,
            title: title.to_string(),
            body: None,
            is_read: false,
            created_at: Utc::now(),
        });
    }
}

#[async_trait]
impl NotificationApi for MockCollabClient {
    async fn list_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.call_counts.lock().await.list_notifications += 1;
        if let Some(err) = self.take_error("list_notifications").await {
            return Err(err.into());
        }
        Ok(self
            .notifications
            .lock()
            .await
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        self.call_counts.lock().await.mark_notification_read += 1;
        if let Some(err) = self.take_error("mark_notification_read").await {
            return Err(err.into());
        }
        let mut notifications = self.notifications.lock().await;
        match notifications.iter_mut().find(|n| n.id == notification_id) {
            Some(notification) => {
                notification.is_read = true;
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("Notification {}", notification_id)).into()),
        }
    }

    async fn delete_notification(&self, notification_id: &str) -> Result<()> {
        self.call_counts.lock().await.delete_notification += 1;
        if let Some(err) = self.take_error("delete_notification").await {
            return Err(err.into());
        }
        self.notifications
            .lock()
            .await
            .retain(|n| n.id != notification_id);
        Ok(())
    }

    async fn delete_notifications(&self, ids: &[String]) -> Result<()> {
        self.call_counts.lock().await.delete_notifications += 1;
        if let Some(err) = self.take_error("delete_notifications").await {
            return Err(err.into());
        }
        self.notifications
            .lock()
            .await
            .retain(|n| !ids.contains(&n.id));
        Ok(())
    }
}

#[async_trait]
impl InvitationApi for MockCollabClient {
    async fn list_invitations_received(
        &self,
        email: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<Invitation>> {
        self.call_counts.lock().await.list_invitations_received += 1;
        if let Some(err) = self.take_error("list_invitations_received").await {
            return Err(err.into());
        }
        Ok(self
            .invitations_received
            .lock()
            .await
            .iter()
            .filter(|i| {
                i.invitee_email == email
                    || user_id.is_some_and(|id| i.invitee_id.as_deref() == Some(id))
            })
            .cloned()
            .collect())
    }

    async fn list_invitations_sent(&self, user_id: &str) -> Result<Vec<Invitation>> {
        self.call_counts.lock().await.list_invitations_sent += 1;
        if let Some(err) = self.take_error("list_invitations_sent").await {
            return Err(err.into());
        }
        Ok(self
            .invitations_sent
            .lock()
            .await
            .iter()
            .filter(|i| i.inviter_id == user_id)
            .cloned()
            .collect())
    }

    async fn respond_to_invitation(
        &self,
        invitation_id: &str,
        response: InvitationResponse,
        message: Option<&str>,
    ) -> Result<()> {
        self.call_counts.lock().await.respond_to_invitation += 1;
        if let Some(err) = self.take_error("respond_to_invitation").await {
            return Err(err.into());
        }
        let mut invitations = self.invitations_received.lock().await;
        match invitations.iter_mut().find(|i| i.id == invitation_id) {
            Some(invitation) => {
                invitation.status = match response {
                    InvitationResponse::Accept => InvitationStatus::Accepted,
                    InvitationResponse::Reject => InvitationStatus::Rejected,
                };
                invitation.responded_at = Some(Utc::now());
                invitation.response_message = message.map(|m| m.to_string());
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("Invitation {}", invitation_id)).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn org(id: &str) -> Organization {
        Organization {
            id: id.to_string(),
            name: format!("Org {}", id),
            member_count: None,
            project_count: None,
        }
    }

    fn project(id: &str, org_id: &str) -> Project {
        Project {
            id: id.to_string(),
            organization_id: org_id.to_string(),
            name: format!("Project {}", id),
            is_public: false,
        }
    }

    fn task(id: &str, project_id: &str) -> Task {
        Task {
            id: id.to_string(),
            project_id: project_id.to_string(),
            title: format!("Task {}", id),
            status: Some("todo".to_string()),
        }
    }

    #[tokio::test]
    async fn test_get_org_found_and_missing() {
        let mock = MockCollabClient::new().with_orgs(vec![org("org-1")]);

        let found = mock.get_org("org-1").await.unwrap();
        assert_eq!(found.name, "Org org-1");

        let missing = mock.get_org("org-2").await;
        assert!(matches!(
            missing,
            Err(Error::Api(ApiError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_list_projects_filters_by_org() {
        let mock = MockCollabClient::new().with_projects(vec![
            project("p-1", "org-1"),
            project("p-2", "org-1"),
            project("p-3", "org-2"),
        ]);

        let projects = mock.list_projects("org-1", "user-1").await.unwrap();
        assert_eq!(projects.len(), 2);
        assert!(projects.iter().all(|p| p.organization_id == "org-1"));
    }

    #[tokio::test]
    async fn test_list_tasks_filters_by_project() {
        let mock = MockCollabClient::new()
            .with_tasks(vec![task("t-1", "p-1"), task("t-2", "p-2")]);

        let tasks = mock.list_tasks("p-1").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t-1");
    }
}
