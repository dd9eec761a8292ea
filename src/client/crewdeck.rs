//! Crewdeck API client implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use super::api::{AuthApi, DirectoryApi, InvitationApi, NotificationApi, RequestApi};
use super::models::{
    Invitation, InvitationResponse, JoinRequest, Notification, Organization, Project,
    ReviewDecision, SessionToken, Task, UserSummary,
};
use crate::error::{ApiError, Result};

/// Crewdeck API base URL
const API_BASE_URL: &str = "https://api.crewdeck.io/api/v1";

/// Rate limit: 360 requests per minute (6 per second)
const RATE_LIMIT_PER_SECOND: u32 = 6;

/// Crewdeck API client
pub struct CrewdeckClient {
    http: HttpClient,
    base_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    auth_state: Arc<RwLock<AuthState>>,
}

/// Internal authentication state
#[derive(Debug, Clone)]
struct AuthState {
    api_key: Option<String>,
    session: Option<SessionToken>,
}

impl CrewdeckClient {
    /// Create a new Crewdeck API client against the production API.
    /// `CREWDECK_API_HOST` overrides the host (tests, staging).
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let base_url =
            std::env::var("CREWDECK_API_HOST").unwrap_or_else(|_| API_BASE_URL.to_string());
        Self::with_base_url(api_key, base_url)
    }

    /// Create a client against a specific API host (tests, staging)
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        // Rate limiter: 6 requests per second = 360 per minute
        let quota = Quota::per_second(std::num::NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap());
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            http,
            base_url,
            rate_limiter,
            auth_state: Arc::new(RwLock::new(AuthState {
                api_key,
                session: None,
            })),
        })
    }

    /// Set the session token
    pub async fn set_session(&self, session: SessionToken) {
        let mut state = self.auth_state.write().await;
        state.session = Some(session);
    }

    /// Check if the session is missing, expired, or expiring within 5 minutes
    async fn is_session_expired(&self) -> bool {
        let state = self.auth_state.read().await;
        match &state.session {
            None => true,
            Some(session) => {
                let now = Utc::now();
                let buffer = chrono::Duration::minutes(5);
                session.expires_at - buffer < now
            }
        }
    }

    /// Get the current session token, refreshing if necessary
    async fn get_valid_session(&self) -> Result<String> {
        if self.is_session_expired().await {
            let api_key = {
                let state = self.auth_state.read().await;
                state.api_key.clone().ok_or(ApiError::Unauthorized)?
            };

            let session = self.authenticate(&api_key).await?;
            self.set_session(session).await;
        }

        let state = self.auth_state.read().await;
        state
            .session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(ApiError::Unauthorized.into())
    }

    /// Make an authenticated request and return the raw response on 2xx.
    ///
    /// Retries once on 401 after refreshing the session.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        self.execute_inner(method, path, body, true).await
    }

    fn execute_inner<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        body: Option<serde_json::Value>,
        retry_on_unauthorized: bool,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<reqwest::Response>> + Send + 'a>>
    {
        Box::pin(async move {
            // Apply rate limiting
            self.rate_limiter.until_ready().await;

            let token = self.get_valid_session().await?;

            let url = format!("{}{}", self.base_url, path);
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header("Authorization", format!("Bearer {}", token));
            if let Some(ref body) = body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(ApiError::from)?;

            let status = response.status();
            match status {
                status if status.is_success() => Ok(response),
                StatusCode::UNAUTHORIZED => {
                    // Refresh the session once, then retry
                    let api_key = {
                        let state = self.auth_state.read().await;
                        state.api_key.clone()
                    };

                    if retry_on_unauthorized && let Some(api_key) = api_key {
                        let session = self.authenticate(&api_key).await?;
                        self.set_session(session).await;
                        return self.execute_inner(method, path, body, false).await;
                    }
                    Err(ApiError::Unauthorized.into())
                }
                StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
                StatusCode::NOT_FOUND => {
                    let error_msg = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Resource not found".to_string());
                    Err(ApiError::NotFound(error_msg).into())
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(60);
                    Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
                }
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    let error_msg = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Bad request".to_string());
                    Err(ApiError::BadRequest(error_msg).into())
                }
                status if status.is_server_error() => {
                    let error_msg = response
                        .text()
                        .await
                        .unwrap_or_else(|_| format!("Server error: {}", status));
                    Err(ApiError::ServerError(error_msg).into())
                }
                _ => {
                    let error_msg = format!("Unexpected status code: {}", status);
                    Err(ApiError::InvalidResponse(error_msg).into())
                }
            }
        })
    }

    /// GET a JSON resource
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::GET, path, None).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into())
    }

    /// Send a request whose response body is ignored
    async fn send_no_content(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<()> {
        self.execute(method, path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for CrewdeckClient {
    async fn authenticate(&self, api_key: &str) -> Result<SessionToken> {
        // Apply rate limiting
        self.rate_limiter.until_ready().await;

        let url = format!("{}/auth/session", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("X-ApiKey", api_key)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized.into());
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        let session: SessionToken = serde_json::from_str(&response_text).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse session response: {}. Body was: {}",
                e, response_text
            ))
        })?;

        Ok(session)
    }
}

#[async_trait]
impl DirectoryApi for CrewdeckClient {
    async fn get_org(&self, org_id: &str) -> Result<Organization> {
        #[derive(Deserialize)]
        struct OrgResponse {
            organization: Organization,
        }

        let path = format!("/orgs/{}", org_id);
        let response: OrgResponse = self.get_json(&path).await?;
        Ok(response.organization)
    }

    async fn list_user_orgs(&self, user_id: &str) -> Result<Vec<Organization>> {
        #[derive(Deserialize)]
        struct OrgsResponse {
            organizations: Vec<Organization>,
        }

        let path = format!("/users/{}/orgs", user_id);
        let response: OrgsResponse = self.get_json(&path).await?;
        Ok(response.organizations)
    }

    async fn list_orgs_administered(&self, user_id: &str) -> Result<Vec<Organization>> {
        #[derive(Deserialize)]
        struct OrgsResponse {
            organizations: Vec<Organization>,
        }

        let path = format!("/users/{}/orgs?role=admin", user_id);
        let response: OrgsResponse = self.get_json(&path).await?;
        Ok(response.organizations)
    }

    async fn list_projects(&self, org_id: &str, user_id: &str) -> Result<Vec<Project>> {
        #[derive(Deserialize)]
        struct ProjectsResponse {
            projects: Vec<Project>,
        }

        let path = format!("/orgs/{}/projects?viewer={}", org_id, user_id);
        let response: ProjectsResponse = self.get_json(&path).await?;
        Ok(response.projects)
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        #[derive(Deserialize)]
        struct TasksResponse {
            tasks: Vec<Task>,
        }

        let path = format!("/projects/{}/tasks", project_id);
        let response: TasksResponse = self.get_json(&path).await?;
        Ok(response.tasks)
    }

    async fn lookup_users_by_ids(&self, ids: &[String]) -> Result<Vec<UserSummary>> {
        #[derive(Deserialize)]
        struct UsersResponse {
            users: Vec<UserSummary>,
        }

        let body = serde_json::json!({ "ids": ids });
        let response = self.execute(Method::POST, "/users/lookup", Some(body)).await?;
        let parsed: UsersResponse = response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        Ok(parsed.users)
    }
}

#[async_trait]
impl RequestApi for CrewdeckClient {
    async fn list_org_join_requests(&self, org_id: &str) -> Result<Vec<JoinRequest>> {
        #[derive(Deserialize)]
        struct RequestsResponse {
            requests: Vec<JoinRequest>,
        }

        let path = format!("/orgs/{}/join-requests", org_id);
        let response: RequestsResponse = self.get_json(&path).await?;
        Ok(response.requests)
    }

    async fn list_sent_join_requests(&self, user_id: &str) -> Result<Vec<JoinRequest>> {
        #[derive(Deserialize)]
        struct RequestsResponse {
            requests: Vec<JoinRequest>,
        }

        let path = format!("/users/{}/join-requests/sent", user_id);
        let response: RequestsResponse = self.get_json(&path).await?;
        Ok(response.requests)
    }

    async fn list_project_join_requests_managed_by(
        &self,
        user_id: &str,
    ) -> Result<Vec<JoinRequest>> {
        #[derive(Deserialize)]
        struct RequestsResponse {
            requests: Vec<JoinRequest>,
        }

        let path = format!("/users/{}/project-join-requests/managed", user_id);
        let response: RequestsResponse = self.get_json(&path).await?;
        Ok(response.requests)
    }

    async fn review_org_join_request(
        &self,
        request_id: &str,
        decision: ReviewDecision,
        reviewer_id: &str,
    ) -> Result<()> {
        let path = format!("/org-join-requests/{}/review", request_id);
        let body = serde_json::json!({
            "status": decision.as_str(),
            "reviewerId": reviewer_id,
        });
        self.send_no_content(Method::POST, &path, Some(body)).await
    }

    async fn review_project_join_request(
        &self,
        request_id: &str,
        decision: ReviewDecision,
        reviewer_id: &str,
    ) -> Result<()> {
        let path = format!("/project-join-requests/{}/review", request_id);
        let body = serde_json::json!({
            "status": decision.as_str(),
            "reviewerId": reviewer_id,
        });
        self.send_no_content(Method::POST, &path, Some(body)).await
    }

    async fn mark_join_request_read(&self, request_id: &str) -> Result<()> {
        let path = format!("/join-requests/{}/read", request_id);
        self.send_no_content(Method::POST, &path, None).await
    }

    async fn delete_org_join_requests(&self, ids: &[String]) -> Result<()> {
        let body = serde_json::json!({ "ids": ids });
        self.send_no_content(Method::POST, "/org-join-requests/delete", Some(body))
            .await
    }

    async fn delete_project_join_requests(&self, ids: &[String]) -> Result<()> {
        let body = serde_json::json!({ "ids": ids });
        self.send_no_content(Method::POST, "/project-join-requests/delete", Some(body))
            .await
    }
}

#[async_trait]
impl NotificationApi for CrewdeckClient {
    async fn list_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        #[derive(Deserialize)]
        struct NotificationsResponse {
            notifications: Vec<Notification>,
        }

        let path = format!("/users/{}/notifications", user_id);
        let response: NotificationsResponse = self.get_json(&path).await?;
        Ok(response.notifications)
    }

    async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        let path = format!("/notifications/{}/read", notification_id);
        self.send_no_content(Method::POST, &path, None).await
    }

    async fn delete_notification(&self, notification_id: &str) -> Result<()> {
        let path = format!("/notifications/{}", notification_id);
        self.send_no_content(Method::DELETE, &path, None).await
    }

    async fn delete_notifications(&self, ids: &[String]) -> Result<()> {
        let body = serde_json::json!({ "ids": ids });
        self.send_no_content(Method::POST, "/notifications/delete", Some(body))
            .await
    }
}

#[async_trait]
impl InvitationApi for CrewdeckClient {
    async fn list_invitations_received(
        &self,
        email: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<Invitation>> {
        #[derive(Deserialize)]
        struct InvitationsResponse {
            invitations: Vec<Invitation>,
        }

        let path = match user_id {
            Some(user_id) => format!(
                "/invitations/received?email={}&userId={}",
                email, user_id
            ),
            None => format!("/invitations/received?email={}", email),
        };
        let response: InvitationsResponse = self.get_json(&path).await?;
        Ok(response.invitations)
    }

    async fn list_invitations_sent(&self, user_id: &str) -> Result<Vec<Invitation>> {
        #[derive(Deserialize)]
        struct InvitationsResponse {
            invitations: Vec<Invitation>,
        }

        let path = format!("/users/{}/invitations/sent", user_id);
        let response: InvitationsResponse = self.get_json(&path).await?;
        Ok(response.invitations)
    }

    async fn respond_to_invitation(
        &self,
        invitation_id: &str,
        response: InvitationResponse,
        message: Option<&str>,
    ) -> Result<()> {
        let path = format!("/invitations/{}/respond", invitation_id);
        let body = serde_json::json!({
            "response": response.as_str(),
            "message": message,
        });
        self.send_no_content(Method::POST, &path, Some(body)).await
    }
}
