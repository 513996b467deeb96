//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the wawidget crates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::persistence::{find_config_file, read_config_file, write_config_file};
use crate::session::SessionConfig;

/// Default origin of the widget backend.
pub const DEFAULT_API_BASE_URL: &str = "https://massivespace.pro/api/";

/// Default per-request timeout (3 minutes).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;

/// Minimum allowed request timeout.
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum allowed request timeout.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Environment variable overriding [`Config::account`].
pub const ENV_ACCOUNT: &str = "WAWIDGET_ACCOUNT";

/// Environment variable overriding [`Config::api_base_url`].
pub const ENV_API_BASE_URL: &str = "WAWIDGET_API_BASE_URL";

/// Environment variable overriding [`Config::storefront_url`].
pub const ENV_STOREFRONT_URL: &str = "WAWIDGET_STOREFRONT_URL";

/// The main configuration struct.
///
/// # Examples
///
/// ```
/// use wawidget_config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.api_base_url, "https://massivespace.pro/api/");
/// assert_eq!(config.request_timeout().as_secs(), 180);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL every backend path is appended to. Always ends with `/`
    /// once normalized.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Storefront origin, used to reach the platform identity endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storefront_url: Option<String>,

    /// Merchant account the widget belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// Upper bound on the wait for any single request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Session token settings.
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storefront_url: None,
            account: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default file locations, then applies
    /// environment overrides.
    ///
    /// If no file is found, defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is found but cannot be read or parsed, or
    /// if the resulting configuration is invalid.
    pub fn load() -> Result<Self> {
        let config = match find_config_file() {
            Some(path) => read_config_file(&path)?,
            None => Self::default(),
        };
        config
            .with_env_overrides(|key| std::env::var(key).ok())
            .finish()
    }

    /// Loads configuration from a specific file, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// configuration is invalid.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wawidget_config::Config;
    ///
    /// # fn example() -> wawidget_config::Result<()> {
    /// let config = Config::load_from("wawidget.json5")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config: Self = read_config_file(path)?;
        config.finish()
    }

    /// Saves the configuration as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    ///
    /// Empty values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use wawidget_config::Config;
    ///
    /// let config = Config::default().with_env_overrides(|key| match key {
    ///     "WAWIDGET_ACCOUNT" => Some("tienda".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.account.as_deref(), Some("tienda"));
    /// ```
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key| lookup(key).filter(|v: &String| !v.trim().is_empty());

        if let Some(account) = get(ENV_ACCOUNT) {
            self.account = Some(account);
        }
        if let Some(url) = get(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(url) = get(ENV_STOREFRONT_URL) {
            self.storefront_url = Some(url);
        }
        self
    }

    /// Returns the request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL is not absolute http(s), the timeout is out
    /// of range, or the session settings are invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use wawidget_config::Config;
    ///
    /// let config = Config {
    ///     request_timeout_secs: 0,
    ///     ..Default::default()
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        check_http_url("api_base_url", &self.api_base_url)?;
        if let Some(url) = &self.storefront_url {
            check_http_url("storefront_url", url)?;
        }

        if !(MIN_REQUEST_TIMEOUT_SECS..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs)
        {
            return Err(ConfigError::InvalidTimeout {
                reason: format!(
                    "{} is outside {MIN_REQUEST_TIMEOUT_SECS}..={MAX_REQUEST_TIMEOUT_SECS} seconds",
                    self.request_timeout_secs
                ),
            });
        }

        self.session.validate()
    }

    fn finish(mut self) -> Result<Self> {
        if !self.api_base_url.ends_with('/') {
            self.api_base_url.push('/');
        }
        if let Some(url) = self.storefront_url.as_mut() {
            while url.ends_with('/') {
                url.pop();
            }
        }
        self.validate()?;
        Ok(self)
    }
}

fn check_http_url(field: &'static str, value: &str) -> Result<()> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));

    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}
