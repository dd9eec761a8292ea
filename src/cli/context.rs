//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, authentication validation, and client initialization.

use std::sync::Arc;

use crate::cache::facade::SweeperGuard;
use crate::cache::{SWEEP_INTERVAL, ScopedCache};
use crate::cli::OutputFormat;
use crate::client::models::SessionToken;
use crate::client::{AuthApi, CollabApi, CrewdeckClient};
use crate::config::Config;
use crate::error::Result;

/// Context for command execution containing config, client, and runtime options.
///
/// Encapsulates the shared state every authenticated command needs:
/// - Loaded and validated configuration
/// - Authenticated API client with a valid session (Arc-wrapped for fan-out)
/// - The process-wide response cache with its background sweeper
/// - Output format preference
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// Authenticated API client
    pub client: Arc<CrewdeckClient>,
    /// Response cache; disabled when --no-cache is passed
    pub cache: ScopedCache,
    /// Output format preference
    pub format: OutputFormat,
    /// Background sweep task, aborted when the context is dropped
    _sweeper: SweeperGuard,
}

impl CommandContext {
    /// Create a new command context with full initialization.
    ///
    /// Loads config, applies the org override, validates that an API key is
    /// present, reuses the cached session when still valid or authenticates
    /// and saves a fresh one, and starts the cache sweeper.
    pub async fn new(
        format: OutputFormat,
        org_override: Option<&str>,
        config_path: Option<&str>,
        no_cache: bool,
    ) -> Result<Self> {
        let mut config = Config::load_at(config_path)?;
        config.validate_auth()?;

        if let Some(org) = org_override {
            config.org_id = Some(org.to_string());
        }

        let client = CrewdeckClient::new(config.api_key.clone())?;

        if !config.is_session_expired()
            && let Some(ref session) = config.session
        {
            client
                .set_session(SessionToken {
                    token: session.token.clone(),
                    expires_at: session.expires_at,
                    user_id: config.user_id.clone().unwrap_or_default(),
                    email: config.email.clone().unwrap_or_default(),
                })
                .await;
        } else {
            let api_key = config.api_key.clone().ok_or_else(|| {
                crate::error::Error::from(crate::error::ConfigError::MissingApiKey)
            })?;
            let session = client.authenticate(&api_key).await?;

            // Persist identity and token so future runs skip this round trip
            config.session = Some(crate::config::SessionToken {
                token: session.token.clone(),
                expires_at: session.expires_at,
            });
            config.user_id = Some(session.user_id.clone());
            config.email = Some(session.email.clone());
            config.save_at(config_path)?;

            client.set_session(session).await;
        }

        let cache = ScopedCache::default().with_enabled(!no_cache);
        let sweeper = cache.spawn_sweeper(SWEEP_INTERVAL);

        Ok(Self {
            config,
            client: Arc::new(client),
            cache,
            format,
            _sweeper: sweeper,
        })
    }

    /// The API client as the trait object the aggregation layer consumes.
    pub fn api(&self) -> Arc<dyn CollabApi> {
        self.client.clone()
    }

    /// Get the organization ID, returning an error if not set.
    pub fn require_org_id(&self) -> Result<&str> {
        self.config
            .org_id
            .as_deref()
            .ok_or_else(|| crate::error::ConfigError::MissingOrgId.into())
    }
}
