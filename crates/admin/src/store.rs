//! Configuration stores: the single mutation point for an edited aggregate.
//!
//! A [`ConfigStore`] holds the value being edited. Every edit goes through
//! [`ConfigStore::set_field`], which replaces exactly one top-level
//! attribute and produces a new value. [`ConfigStore::save`] sends the
//! whole value and adopts whatever the server returns.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use wawidget_client::{AdminApi, ApiResult};
use wawidget_protocol::{ButtonField, WhatsAppButton, Widget, WidgetField};

use crate::error::{AdminError, Result};

/// A value edited one top-level attribute at a time.
pub trait Aggregate: Clone + Send + Sync + 'static {
    /// A new value for one attribute.
    type Field: Send;

    /// Returns a new value with one attribute replaced.
    #[must_use]
    fn with_field(&self, field: Self::Field) -> Self;
}

impl Aggregate for Widget {
    type Field = WidgetField;

    fn with_field(&self, field: WidgetField) -> Self {
        Widget::with_field(self, field)
    }
}

impl Aggregate for WhatsAppButton {
    type Field = ButtonField;

    fn with_field(&self, field: ButtonField) -> Self {
        WhatsAppButton::with_field(self, field)
    }
}

/// Where an aggregate is loaded from and saved to.
#[async_trait]
pub trait Backend<A: Aggregate>: Send + Sync {
    /// Fetches the current value for `account`.
    async fn fetch(&self, account: &str) -> ApiResult<A>;

    /// Persists `value` and returns what the server stored.
    async fn persist(&self, account: &str, value: &A) -> ApiResult<A>;
}

#[async_trait]
impl Backend<Widget> for AdminApi {
    async fn fetch(&self, account: &str) -> ApiResult<Widget> {
        self.widget(account).await
    }

    async fn persist(&self, account: &str, value: &Widget) -> ApiResult<Widget> {
        self.update_widget(account, value).await
    }
}

#[async_trait]
impl Backend<WhatsAppButton> for AdminApi {
    async fn fetch(&self, account: &str) -> ApiResult<WhatsAppButton> {
        self.button(account).await
    }

    async fn persist(&self, account: &str, value: &WhatsAppButton) -> ApiResult<WhatsAppButton> {
        self.update_button(account, value).await
    }
}

/// Store for the contact widget.
pub type WidgetStore = ConfigStore<Widget, AdminApi>;

/// Store for the WhatsApp help button.
pub type ButtonStore = ConfigStore<WhatsAppButton, AdminApi>;

/// Holds the aggregate being edited for one account.
///
/// Saves take `&mut self`, so saves through one store never overlap. When
/// several stores save the same account, the last response wins.
#[derive(Debug)]
pub struct ConfigStore<A, B> {
    backend: B,
    account: String,
    current: Option<A>,
    error: Option<String>,
}

impl<A: Aggregate, B: Backend<A>> ConfigStore<A, B> {
    /// Creates an empty store for `account`.
    #[must_use]
    pub fn new(backend: B, account: impl Into<String>) -> Self {
        Self {
            backend,
            account: account.into(),
            current: None,
            error: None,
        }
    }

    /// Returns the merchant account.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Returns the value being edited.
    #[must_use]
    pub const fn current(&self) -> Option<&A> {
        self.current.as_ref()
    }

    /// Returns the banner message of the last failed load or save.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Dismisses the banner message.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Fetches the value from the backend.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Load`] if the backend returned no value. The
    /// previously loaded value, if any, is kept.
    #[instrument(skip(self), fields(account = %self.account))]
    pub async fn load(&mut self) -> Result<&A> {
        let result = self.backend.fetch(&self.account).await;
        match result.data {
            Some(value) => {
                debug!("configuration loaded");
                self.error = None;
                Ok(self.current.insert(value))
            }
            None => {
                warn!(message = %result.message, "configuration load failed");
                self.error = Some(result.message.clone());
                Err(AdminError::Load {
                    message: result.message,
                })
            }
        }
    }

    /// Replaces one attribute and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotLoaded`] before the first successful load.
    pub fn set_field(&mut self, field: A::Field) -> Result<&A> {
        let current = self.current.as_ref().ok_or(AdminError::NotLoaded)?;
        let next = current.with_field(field);
        Ok(self.current.insert(next))
    }

    /// Persists the whole value and adopts the server's version of it.
    ///
    /// A failed save keeps the local edits and sets the banner message; a
    /// successful one clears it.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotLoaded`] before the first successful load and
    /// [`AdminError::Save`] if the backend rejected the value.
    #[instrument(skip(self), fields(account = %self.account))]
    pub async fn save(&mut self) -> Result<&A> {
        let current = self.current.as_ref().ok_or(AdminError::NotLoaded)?;
        let result = self.backend.persist(&self.account, current).await;

        if !result.success {
            warn!(message = %result.message, "configuration save failed");
            self.error = Some(result.message.clone());
            return Err(AdminError::Save {
                message: result.message,
            });
        }

        info!(message = %result.message, "configuration saved");
        self.error = None;
        if let Some(stored) = result.data {
            self.current = Some(stored);
        }
        self.current.as_ref().ok_or(AdminError::NotLoaded)
    }
}
