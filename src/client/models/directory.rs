//! Organization, project, task and user directory models

use serde::{Deserialize, Serialize};

/// Organization resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID
    pub id: String,

    /// Organization name
    pub name: String,

    /// Number of members (optional, may not be in all responses)
    #[serde(skip_serializing_if = "Option::is_none", rename = "memberCount")]
    pub member_count: Option<usize>,

    /// Number of projects (optional)
    #[serde(skip_serializing_if = "Option::is_none", rename = "projectCount")]
    pub project_count: Option<usize>,
}

/// Project resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID
    pub id: String,

    /// Owning organization ID
    pub organization_id: String,

    /// Project name
    pub name: String,

    /// Whether the project is visible to non-members
    #[serde(default)]
    pub is_public: bool,
}

/// Task resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task ID
    pub id: String,

    /// Owning project ID
    pub project_id: String,

    /// Task title
    pub title: String,

    /// Task workflow state (todo, in_progress, done)
    #[serde(default)]
    pub status: Option<String>,
}

/// Minimal user record returned by batched display-name lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID
    pub id: String,

    /// Display name
    pub name: String,
}
