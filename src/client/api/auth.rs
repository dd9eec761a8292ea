//! Authentication API trait

use async_trait::async_trait;

use crate::client::models::SessionToken;
use crate::error::Result;

/// Authentication operations
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange an API key for a session token
    async fn authenticate(&self, api_key: &str) -> Result<SessionToken>;
}
