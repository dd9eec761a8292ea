//! Configuration management for the Crewdeck CLI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Crewdeck API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default organization ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,

    /// Signed-in user ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Signed-in user email (used to match invitations sent by address)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Cached session token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionToken>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Session token with expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    /// The session token string
    pub token: String,

    /// Token expiration time
    pub expires_at: DateTime<Utc>,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Fallback poll interval for the unread watcher, in seconds.
    /// Push events are the fast path; the poll covers missed pushes.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval_secs() -> u64 {
    30
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: None,
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".crewdeck").join("config.yaml"))
    }

    /// Resolve the config path from an optional override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional path override
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to an optional path override
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Check if the session token is expired or will expire soon (within 5 minutes)
    pub fn is_session_expired(&self) -> bool {
        match &self.session {
            None => true,
            Some(session) => {
                let now = Utc::now();
                let buffer = chrono::Duration::minutes(5);
                session.expires_at - buffer < now
            }
        }
    }

    /// Validate that required configuration is present
    pub fn validate_auth(&self) -> Result<()> {
        if self.api_key.is_none() {
            return Err(ConfigError::MissingApiKey.into());
        }
        Ok(())
    }

    /// Get the signed-in user ID, returning an error if not set
    pub fn require_user_id(&self) -> Result<&str> {
        self.user_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingIdentity.into())
    }

    /// Get the signed-in user email, returning an error if not set
    pub fn require_email(&self) -> Result<&str> {
        self.email
            .as_deref()
            .ok_or_else(|| ConfigError::MissingIdentity.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(config.org_id.is_none());
        assert!(config.user_id.is_none());
        assert!(config.session.is_none());
        assert_eq!(config.preferences.poll_interval_secs, 30);
    }

    #[test]
    fn test_session_expiry() {
        let mut config = Config::default();

        // No token should be expired
        assert!(config.is_session_expired());

        // Token expired in the past
        config.session = Some(SessionToken {
            token: "test".to_string(),
            expires_at: Utc::now() - chrono::Duration::hours(1),
        });
        assert!(config.is_session_expired());

        // Token expires in the future (more than 5 minutes)
        config.session = Some(SessionToken {
            token: "test".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        });
        assert!(!config.is_session_expired());

        // Token expires soon (less than 5 minutes)
        config.session = Some(SessionToken {
            token: "test".to_string(),
            expires_at: Utc::now() + chrono::Duration::minutes(2),
        });
        assert!(config.is_session_expired());
    }

    #[test]
    fn test_require_identity() {
        let mut config = Config::default();
        assert!(config.require_user_id().is_err());
        assert!(config.require_email().is_err());

        config.user_id = Some("user-1".to_string());
        config.email = Some("user@example.com".to_string());
        assert_eq!(config.require_user_id().unwrap(), "user-1");
        assert_eq!(config.require_email().unwrap(), "user@example.com");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = Config::default();
        config.api_key = Some("key-123".to_string());
        config.org_id = Some("org-1".to_string());
        config.save_to(path.clone()).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("key-123"));
        assert_eq!(loaded.org_id.as_deref(), Some("org-1"));
    }
}
