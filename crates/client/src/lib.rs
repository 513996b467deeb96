//! HTTP client for the wawidget backend.
//!
//! # Overview
//!
//! - [`ApiClient`]: single-attempt GET/POST/PUT calls with a fixed timeout,
//!   normalized into [`ApiResult`]
//! - [`PublicApi`] and [`AdminApi`]: typed endpoints
//! - [`SessionResolver`], [`SessionTokenCache`] and [`IdentityProvider`]:
//!   the session token attached to admin calls
//! - [`Error`]: failures around a call, never the call outcome itself
//!
//! # Outcomes
//!
//! Every call returns an [`ApiResult`]: `success`, a `message`, and the
//! decoded `data`. The message comes from the response envelope, or from the
//! error envelope on failure; both the admin shape `{ message }` and the
//! public shape `{ error: { message } }` are understood.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use wawidget_client::{AdminApi, ApiClient, SessionResolver};
//! use wawidget_config::Config;
//!
//! # async fn example() -> wawidget_client::Result<()> {
//! let config = Config::load()?;
//! let resolver = Arc::new(SessionResolver::from_config(&config)?);
//! let admin = AdminApi::new(ApiClient::authenticated(&config, resolver)?);
//!
//! let result = admin.widget("mitienda").await;
//! match result.into_data() {
//!     Some(widget) => println!("{} options", widget.options.len()),
//!     None => println!("no widget"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod envelope;
pub mod error;
pub mod session;

pub use api::{AdminApi, PublicApi};
pub use client::{ApiClient, Auth, TOKEN_HEADER};
pub use envelope::{ApiResult, ErrorShape};
pub use error::{Error, Result};
pub use session::{
    AuthenticatedUser, CachedToken, IdentityProvider, PlatformIdentity, SessionResolver,
    SessionTokenCache,
};
