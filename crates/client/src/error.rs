//! Error types for client setup and session handling.
//!
//! HTTP outcomes never surface here: they are folded into
//! [`ApiResult`](crate::ApiResult). These errors cover everything around the
//! call itself, such as building the HTTP client, reading the token cache or
//! looking up the logged-in user.

/// Errors that can occur outside a single backend call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP client could not be built or a request could not be sent.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The identity endpoint did not report a usable user.
    #[error("identity lookup failed: {reason}")]
    Identity {
        /// A description of why the lookup failed.
        reason: String,
    },

    /// A session token cannot be carried in a request header.
    #[error("session token is not a valid header value")]
    InvalidToken,

    /// The storefront URL needed for identity lookups is not configured.
    #[error("storefront_url is not configured")]
    MissingStorefront,

    /// The token cache file is not valid JSON.
    #[error("corrupt session cache: {0}")]
    CacheFormat(#[from] serde_json::Error),

    /// An I/O error occurred during cache operations.
    #[error("I/O error during cache operation: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] wawidget_config::ConfigError),
}

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_identity() {
        let err = Error::Identity {
            reason: "401 Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "identity lookup failed: 401 Unauthorized");
    }

    #[test]
    fn error_display_missing_storefront() {
        assert_eq!(
            Error::MissingStorefront.to_string(),
            "storefront_url is not configured"
        );
    }

    #[test]
    fn error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(io_err);
        assert!(err.to_string().contains("I/O error during cache operation"));
    }
}
