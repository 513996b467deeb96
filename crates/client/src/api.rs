//! Typed backend endpoints.
//!
//! [`PublicApi`] covers the unauthenticated storefront calls and
//! [`AdminApi`] the session-authenticated configuration calls. Both are thin
//! wrappers that fix the path and payload types over an [`ApiClient`].

use wawidget_protocol::{
    CallMeBackRequest, CallMeBackResponse, LookupEntry, LookupKey, PublicWidget, ScheduleStatus,
    SelectOption, TimeZone, WhatsAppButton, Widget,
};

use crate::client::{ApiClient, path_segment};
use crate::envelope::ApiResult;

/// Unauthenticated storefront endpoints.
#[derive(Debug, Clone)]
pub struct PublicApi {
    client: ApiClient,
}

impl PublicApi {
    /// Wraps `client`, which should use [`Auth::Public`](crate::Auth::Public).
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches the widget shown on the storefront.
    pub async fn widget(&self, account: &str) -> ApiResult<PublicWidget> {
        let path = format!("whats-app-widget/{}", path_segment(account));
        self.client.get(&path, &[]).await
    }

    /// Submits a call-back request.
    pub async fn call_me_back(
        &self,
        account: &str,
        request: &CallMeBackRequest,
    ) -> ApiResult<CallMeBackResponse> {
        let path = format!("whats-app-widget/{}/call-me-back", path_segment(account));
        self.client.post(&path, request).await
    }

    /// Asks whether the WhatsApp button is within its opening hours.
    pub async fn active_schedule_status(&self, account: &str) -> ApiResult<ScheduleStatus> {
        let path = format!("whats-app/{}/active-schedule-status", path_segment(account));
        self.client.get(&path, &[]).await
    }
}

/// Session-authenticated configuration endpoints.
#[derive(Debug, Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    /// Wraps `client`, which should use [`Auth::Session`](crate::Auth::Session).
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches the account's widget for editing.
    pub async fn widget(&self, account: &str) -> ApiResult<Widget> {
        let path = format!("whats-app-widget/{}/admin", path_segment(account));
        self.client.get(&path, &[]).await
    }

    /// Persists the whole widget and returns the server's copy.
    pub async fn update_widget(&self, account: &str, widget: &Widget) -> ApiResult<Widget> {
        let path = format!("whats-app-widget/{}/admin/{}", path_segment(account), widget.id);
        self.client.put(&path, widget).await
    }

    /// Fetches the account's WhatsApp button for editing.
    pub async fn button(&self, account: &str) -> ApiResult<WhatsAppButton> {
        let path = format!("whats-app-button/{}/admin", path_segment(account));
        self.client.get(&path, &[]).await
    }

    /// Persists the whole button and returns the server's copy.
    pub async fn update_button(
        &self,
        account: &str,
        button: &WhatsAppButton,
    ) -> ApiResult<WhatsAppButton> {
        let path = format!("whats-app-button/{}/admin/{}", path_segment(account), button.id);
        self.client.put(&path, button).await
    }

    /// Lists the value types, as picker entries.
    pub async fn type_values(&self) -> ApiResult<Vec<SelectOption<LookupKey>>> {
        self.lookup("type-values").await
    }

    /// Lists the option types, as picker entries.
    pub async fn type_widgets(&self) -> ApiResult<Vec<SelectOption<LookupKey>>> {
        self.lookup("type-widgets").await
    }

    /// Lists the time zones, as picker entries.
    pub async fn time_zones(&self) -> ApiResult<Vec<SelectOption<TimeZone>>> {
        let result: ApiResult<Vec<TimeZone>> = self.client.get("time-zones", &[]).await;
        result.map(|zones| zones.into_iter().map(SelectOption::from).collect())
    }

    async fn lookup(&self, path: &str) -> ApiResult<Vec<SelectOption<LookupKey>>> {
        let result: ApiResult<Vec<LookupEntry>> = self.client.get(path, &[]).await;
        result.map(|rows| rows.into_iter().map(SelectOption::from).collect())
    }
}
