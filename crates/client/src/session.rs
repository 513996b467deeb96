//! Session token resolution and caching.
//!
//! Authenticated calls carry the identity of the logged-in platform user in
//! a `token-id` header. The identity is looked up through the platform
//! "who am I" endpoint and kept in a small JSON file until it expires, so
//! that one lookup serves a whole working day.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use wawidget_client::{PlatformIdentity, SessionResolver, SessionTokenCache};
//!
//! # async fn example() -> wawidget_client::Result<()> {
//! let provider = PlatformIdentity::new(
//!     "https://mitienda.example.com",
//!     "/api/vtexid/pub/authenticated/user",
//!     Duration::from_secs(30),
//! )?;
//! let cache = SessionTokenCache::new("/tmp/wawidget-session.json");
//! let resolver = SessionResolver::new(Arc::new(provider), cache, Duration::from_secs(86_400));
//!
//! let token = resolver.token().await?;
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// The logged-in user as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Stable user identity; this is what travels as the session token.
    pub user_id: String,
    /// Login, usually an email address.
    #[serde(default)]
    pub user: String,
    /// Kind of account.
    #[serde(default)]
    pub user_type: String,
}

/// Source of the current user's identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Looks up the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if no user can be determined.
    async fn current_user(&self) -> Result<AuthenticatedUser>;
}

/// Looks the user up through the storefront's identity endpoint.
#[derive(Debug, Clone)]
pub struct PlatformIdentity {
    http: reqwest::Client,
    url: String,
}

impl PlatformIdentity {
    /// Creates a provider for `identity_path` on `storefront_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn new(storefront_url: &str, identity_path: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: format!("{}{identity_path}", storefront_url.trim_end_matches('/')),
        })
    }

    /// Builds a provider from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingStorefront`] if no storefront URL is set.
    pub fn from_config(config: &wawidget_config::Config) -> Result<Self> {
        let storefront = config
            .storefront_url
            .as_deref()
            .ok_or(Error::MissingStorefront)?;
        Self::new(
            storefront,
            &config.session.identity_path,
            config.request_timeout(),
        )
    }
}

#[async_trait]
impl IdentityProvider for PlatformIdentity {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn current_user(&self) -> Result<AuthenticatedUser> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "identity endpoint refused");
            return Err(Error::Identity {
                reason: format!("identity endpoint returned {status}"),
            });
        }

        let user: AuthenticatedUser = response.json().await?;
        if user.user_id.is_empty() {
            return Err(Error::Identity {
                reason: "no user is logged in".to_string(),
            });
        }
        debug!(user_type = %user.user_type, "resolved current user");
        Ok(user)
    }
}

/// A token with its expiry, as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    /// The session token.
    pub token: String,
    /// Instant after which the token must be looked up again.
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Creates an entry that expires `ttl` after `now`.
    #[must_use]
    pub fn issued_at(token: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            token: token.into(),
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Returns whether the token is still usable at `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use chrono::Utc;
    /// use wawidget_client::CachedToken;
    ///
    /// let now = Utc::now();
    /// let cached = CachedToken::issued_at("u-1", now, Duration::from_secs(60));
    /// assert!(cached.is_valid_at(now));
    /// assert!(!cached.is_valid_at(cached.expires_at));
    /// ```
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// File-backed storage for one [`CachedToken`].
#[derive(Debug, Clone)]
pub struct SessionTokenCache {
    path: PathBuf,
}

impl SessionTokenCache {
    /// Creates a cache stored at `path`. Nothing is touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the cache file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored token.
    ///
    /// Returns `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<CachedToken>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no cached session token");
                Ok(None)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Stores `token`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    #[instrument(skip(self, token), fields(path = %self.path.display(), expires_at = %token.expires_at))]
    pub fn store(&self, token: &CachedToken) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(token)?)?;
        debug!("session token cached");
        Ok(())
    }

    /// Removes the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(Error::Io(e)),
            _ => Ok(()),
        }
    }
}

/// Hands out the session token, refreshing it when absent or expired.
///
/// Concurrent callers share one refresh.
pub struct SessionResolver {
    provider: Arc<dyn IdentityProvider>,
    cache: SessionTokenCache,
    ttl: Duration,
    refresh: Mutex<()>,
}

impl std::fmt::Debug for SessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResolver")
            .field("cache", &self.cache)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, cache: SessionTokenCache, ttl: Duration) -> Self {
        Self {
            provider,
            cache,
            ttl,
            refresh: Mutex::new(()),
        }
    }

    /// Builds a resolver using the platform identity endpoint and the
    /// configured cache location.
    ///
    /// # Errors
    ///
    /// Returns an error if the storefront URL or cache path cannot be
    /// resolved.
    pub fn from_config(config: &wawidget_config::Config) -> Result<Self> {
        let provider = PlatformIdentity::from_config(config)?;
        let cache = SessionTokenCache::new(config.session.resolved_cache_path()?);
        Ok(Self::new(Arc::new(provider), cache, config.session.ttl()))
    }

    /// Returns the current session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not cached and the identity lookup
    /// fails, or if the fresh token cannot be cached.
    pub async fn token(&self) -> Result<SecretString> {
        self.token_at(Utc::now()).await
    }

    /// Same as [`token`](Self::token), evaluated at `now`.
    ///
    /// # Errors
    ///
    /// See [`token`](Self::token).
    #[instrument(skip(self))]
    pub async fn token_at(&self, now: DateTime<Utc>) -> Result<SecretString> {
        let _guard = self.refresh.lock().await;

        match self.cache.load() {
            Ok(Some(cached)) if cached.is_valid_at(now) => {
                debug!("using cached session token");
                return Ok(SecretString::from(cached.token));
            }
            Ok(Some(_)) => debug!("cached session token expired"),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "ignoring unreadable session cache"),
        }

        let user = self.provider.current_user().await?;
        let cached = CachedToken::issued_at(user.user_id, now, self.ttl);
        self.cache.store(&cached)?;
        Ok(SecretString::from(cached.token))
    }
}
