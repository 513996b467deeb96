//! Session token settings.
//!
//! Authenticated admin calls carry the identity of the logged-in user. The
//! identity is looked up once through the platform "who am I" endpoint and
//! cached on disk until it expires.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default platform endpoint that reports the logged-in user.
pub const DEFAULT_IDENTITY_PATH: &str = "/api/vtexid/pub/authenticated/user";

/// Default lifetime of a cached session token (24 hours).
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;

/// Settings for resolving and caching the session token.
///
/// # Examples
///
/// ```
/// use wawidget_config::SessionConfig;
///
/// let session = SessionConfig::default();
/// assert_eq!(session.ttl().as_secs(), 86_400);
/// assert!(session.cache_path.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the "who am I" endpoint, relative to the storefront URL.
    #[serde(default = "default_identity_path")]
    pub identity_path: String,

    /// How long a resolved token stays valid, in seconds.
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Where the token cache lives. Defaults to the platform cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
}

fn default_identity_path() -> String {
    DEFAULT_IDENTITY_PATH.to_string()
}

fn default_ttl() -> u64 {
    DEFAULT_TTL_SECS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            identity_path: default_identity_path(),
            ttl_secs: DEFAULT_TTL_SECS,
            cache_path: None,
        }
    }
}

impl SessionConfig {
    /// Returns the token lifetime as a [`Duration`].
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Returns the cache path, falling back to the platform default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] if no path is configured and
    /// the platform cache directory cannot be determined.
    pub fn resolved_cache_path(&self) -> Result<PathBuf> {
        match &self.cache_path {
            Some(path) => Ok(path.clone()),
            None => crate::persistence::default_session_cache_path(),
        }
    }

    /// Validates the session settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSession`] for a zero TTL or an identity
    /// path that is not absolute.
    pub fn validate(&self) -> Result<()> {
        if self.ttl_secs == 0 {
            return Err(ConfigError::InvalidSession {
                reason: "ttl_secs must be greater than zero".to_string(),
            });
        }

        if !self.identity_path.starts_with('/') {
            return Err(ConfigError::InvalidSession {
                reason: format!("identity_path {:?} must start with '/'", self.identity_path),
            });
        }

        Ok(())
    }
}
