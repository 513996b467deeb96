//! The backend HTTP client.
//!
//! [`ApiClient`] makes exactly one attempt per call, bounded by the
//! configured timeout, and folds every outcome into an [`ApiResult`].

use std::sync::Arc;
use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::envelope::{ApiResult, ErrorShape, FALLBACK_ERROR_MESSAGE, SuccessEnvelope, error_message};
use crate::error::{Error, Result};
use crate::session::SessionResolver;

/// Header carrying the session token on authenticated calls.
pub const TOKEN_HEADER: &str = "token-id";

/// Characters escaped when a value is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Escapes `value` for use as one URL path segment.
///
/// # Examples
///
/// ```
/// use wawidget_client::client::path_segment;
///
/// assert_eq!(path_segment("mitienda"), "mitienda");
/// assert_eq!(path_segment("a/b c"), "a%2Fb%20c");
/// ```
#[must_use]
pub fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// How a client authenticates.
#[derive(Debug, Clone)]
pub enum Auth {
    /// No credentials; failures use the public error envelope.
    Public,
    /// Session token header; failures use the admin error envelope.
    Session(Arc<SessionResolver>),
}

impl Auth {
    const fn error_shape(&self) -> ErrorShape {
        match self {
            Self::Public => ErrorShape::Public,
            Self::Session(_) => ErrorShape::Admin,
        }
    }
}

/// HTTP client for the widget backend.
///
/// # Examples
///
/// ```no_run
/// use wawidget_client::{ApiClient, ApiResult};
/// use wawidget_config::Config;
/// use wawidget_protocol::PublicWidget;
///
/// # async fn example() -> wawidget_client::Result<()> {
/// let client = ApiClient::public(&Config::default())?;
/// let result: ApiResult<PublicWidget> = client.get("whats-app-widget/mitienda", &[]).await;
/// if !result.success {
///     eprintln!("{}", result.message);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// `base_url` is used as a prefix; a trailing `/` is added if missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration, auth: Auth) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    /// Creates an unauthenticated client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn public(config: &wawidget_config::Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.request_timeout(), Auth::Public)
    }

    /// Creates a session-authenticated client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn authenticated(
        config: &wawidget_config::Config,
        resolver: Arc<SessionResolver>,
    ) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            config.request_timeout(),
            Auth::Session(resolver),
        )
    }

    /// Returns the URL prefix every path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns whether calls carry a session token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth, Auth::Session(_))
    }

    /// Sends a GET with `query` in the query string.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<T> {
        let mut request = self.request(Method::GET, path);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(Method::GET, path, request).await
    }

    /// Sends a POST with `body` as JSON.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path).json(body);
        self.execute(Method::POST, path, request).await
    }

    /// Sends a PUT with `body` as JSON.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, path).json(body);
        self.execute(Method::PUT, path, request).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        self.http.request(method, url)
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        match &self.auth {
            Auth::Public => Ok(request),
            Auth::Session(resolver) => {
                let token = resolver.token().await?;
                let mut value = HeaderValue::from_str(token.expose_secret())
                    .map_err(|_| Error::InvalidToken)?;
                value.set_sensitive(true);
                Ok(request.header(TOKEN_HEADER, value))
            }
        }
    }

    #[instrument(skip(self, request), fields(authenticated = self.is_authenticated()))]
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let request = match self.authorize(request).await {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "could not resolve session token");
                return ApiResult::failure(FALLBACK_ERROR_MESSAGE);
            }
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "request failed");
                return ApiResult::failure(FALLBACK_ERROR_MESSAGE);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(%status, error = %e, "failed to read response body");
                return ApiResult::failure(FALLBACK_ERROR_MESSAGE);
            }
        };

        if !status.is_success() {
            let message = error_message(&body, self.auth.error_shape());
            warn!(%status, %message, "backend reported failure");
            return ApiResult::failure(message);
        }

        debug!(%status, "response received");
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let envelope: SuccessEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "response is not a JSON envelope");
            return ApiResult::failure(FALLBACK_ERROR_MESSAGE);
        }
    };

    let message = envelope.message();
    match envelope.data {
        None | Some(serde_json::Value::Null) => ApiResult::ok(message, None),
        Some(data) => match serde_json::from_value(data) {
            Ok(data) => ApiResult::ok(message, Some(data)),
            Err(e) => {
                warn!(error = %e, "response payload has an unexpected shape");
                ApiResult::failure(FALLBACK_ERROR_MESSAGE)
            }
        },
    }
}
