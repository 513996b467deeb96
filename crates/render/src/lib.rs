//! Storefront engine for wawidget.
//!
//! This crate turns the configuration served by the backend into what a
//! storefront draws, and drives the visitor's interaction with it. Drawing
//! itself is left to the host: every output here is plain data.
//!
//! # Overview
//!
//! - [`style`]: trigger button and modal placement for a viewport width
//! - [`link`]: WhatsApp deep links and the [`LinkOpener`] that launches them
//! - [`callback`]: the call-back form and its phone/name validation
//! - [`session`]: [`WidgetSession`] and [`ButtonSession`], the two storefront
//!   components
//! - [`embed`]: [`EmbedAdapter`] for the third-party chat embed, with a
//!   bounded "wait for element" and explicit teardown
//!
//! # Examples
//!
//! ```no_run
//! use wawidget_client::{ApiClient, PublicApi};
//! use wawidget_config::Config;
//! use wawidget_render::WidgetSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let api = PublicApi::new(ApiClient::public(&config)?);
//!
//! let mut session = WidgetSession::new(api, "mitienda");
//! session.mount().await?;
//! if let Some(view) = session.view(1280) {
//!     println!("{}", view.trigger.style);
//! }
//! # Ok(())
//! # }
//! ```

pub mod callback;
pub mod embed;
pub mod error;
pub mod link;
pub mod session;
pub mod style;

pub use callback::{CallbackForm, FormStatus};
pub use embed::{
    EmbedAdapter, EmbedNode, HostDocument, NodeHandle, RetryPolicy, VisibilityBridge,
    VisibilitySubscription,
};
pub use error::{RenderError, Result};
pub use link::{LinkOpener, SystemOpener};
pub use session::{
    ButtonSession, FormView, Icon, ModalView, MountGuard, OptionAction, OptionRow, Panel,
    PanelView, TriggerView, WidgetSession, WidgetView,
};
pub use style::{StyleMap, resolve_button_style, resolve_modal_style};
