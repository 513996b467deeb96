//! Admin engine for wawidget.
//!
//! # Overview
//!
//! - [`ConfigStore`]: load, edit one attribute at a time, save and adopt the
//!   server's copy. [`WidgetStore`] and [`ButtonStore`] are the two stores
//!   backed by [`AdminApi`](wawidget_client::AdminApi).
//! - [`AdminEditor`]: the widget editor, with lookups, option selection,
//!   colors, placement, options and opening hours
//!
//! # Examples
//!
//! ```no_run
//! use wawidget_admin::{AdminEditor, ColorTarget};
//! use wawidget_client::AdminApi;
//!
//! # async fn example(api: AdminApi) -> wawidget_admin::Result<()> {
//! let mut editor = AdminEditor::new(api, "mitienda");
//! editor.load().await?;
//! editor.set_color(ColorTarget::Header, "#075e54")?;
//! editor.save().await?;
//! # Ok(())
//! # }
//! ```

pub mod editor;
pub mod error;
pub mod store;

pub use editor::{AdminEditor, ColorChange, ColorTarget, Lookups};
pub use error::{AdminError, Result};
pub use store::{Aggregate, Backend, ButtonStore, ConfigStore, WidgetStore};
