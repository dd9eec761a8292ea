//! Directory API trait: organizations, projects, tasks and users

use async_trait::async_trait;

use crate::client::models::{Organization, Project, Task, UserSummary};
use crate::error::Result;

/// Organization, project, task and user listing operations
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Get one organization's metadata
    async fn get_org(&self, org_id: &str) -> Result<Organization>;

    /// List organizations the user belongs to
    async fn list_user_orgs(&self, user_id: &str) -> Result<Vec<Organization>>;

    /// List organizations the user administers
    async fn list_orgs_administered(&self, user_id: &str) -> Result<Vec<Organization>>;

    /// List projects in an organization visible to the user
    async fn list_projects(&self, org_id: &str, user_id: &str) -> Result<Vec<Project>>;

    /// List tasks in a project
    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>>;

    /// Look up display names for a batch of user IDs.
    ///
    /// One round-trip for all distinct IDs, used for invitation enrichment.
    async fn lookup_users_by_ids(&self, ids: &[String]) -> Result<Vec<UserSummary>>;
}
