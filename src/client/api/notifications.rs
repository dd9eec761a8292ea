//! Notification API trait

use async_trait::async_trait;

use crate::client::models::Notification;
use crate::error::Result;

/// Notification operations
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// List notifications addressed to the user
    async fn list_notifications(&self, user_id: &str) -> Result<Vec<Notification>>;

    /// Flag a notification as read
    async fn mark_notification_read(&self, notification_id: &str) -> Result<()>;

    /// Delete one notification
    async fn delete_notification(&self, notification_id: &str) -> Result<()>;

    /// Delete a batch of notifications in one call
    async fn delete_notifications(&self, ids: &[String]) -> Result<()>;
}
