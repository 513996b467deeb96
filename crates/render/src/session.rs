//! Storefront sessions for the contact widget and the WhatsApp button.
//!
//! A [`WidgetSession`] fetches the widget once, then reacts to visitor
//! input: opening the modal, picking an option, filling in the call-back
//! form. [`WidgetSession::view`] turns the current state into everything
//! needed to draw it. A widget that is inactive, absent or has no active
//! options stays hidden and makes no further calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, instrument, warn};
use wawidget_client::PublicApi;
use wawidget_protocol::{ContactOption, OptionId, OptionType, ScheduleStatus, Widget};

use crate::callback::CallbackForm;
use crate::embed::{EmbedAdapter, HostDocument, RetryPolicy};
use crate::error::{RenderError, Result};
use crate::link::{LinkOpener, SystemOpener, product_help_link, whatsapp_option_link};
use crate::style::{StyleMap, resolve_button_style, resolve_modal_style};

/// Heading of the call-back form.
pub const FORM_PROMPT: &str = "Ingresa los datos solicitados donde nos estaremos contactando.";

/// Label of the WhatsApp help button.
pub const HELP_LABEL: &str = "Necesito ayuda con mi compra";

/// Liveness flag shared between a session and its owner.
///
/// Once torn down, results of requests still in flight are discarded.
#[derive(Debug, Clone)]
pub struct MountGuard(Arc<AtomicBool>);

impl Default for MountGuard {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl MountGuard {
    /// Creates a live guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the owner is still mounted.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Marks the owner as gone.
    pub fn teardown(&self) {
        self.0.store(false, Ordering::Release);
    }

    fn check(&self) -> Result<()> {
        if self.is_live() {
            Ok(())
        } else {
            debug!("discarding result after teardown");
            Err(RenderError::TornDown)
        }
    }
}

/// An icon drawn by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// WhatsApp logo.
    WhatsApp,
    /// Close cross.
    Close,
    /// Telephone handset.
    Phone,
}

/// What the modal body shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    /// The option list.
    #[default]
    Options,
    /// The call-back form.
    CallbackForm,
}

/// Result of picking an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionAction {
    /// A WhatsApp conversation was opened at this URL.
    OpenLink(String),
    /// The call-back form is now showing.
    ShowCallbackForm,
    /// The external chat should be opened with
    /// [`WidgetSession::launch_chat`].
    OpenChat,
    /// The option type has no storefront behavior.
    Unsupported(OptionType),
}

/// One row of the option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRow {
    /// Option identity, passed back to [`WidgetSession::select_option`].
    pub id: OptionId,
    /// Heading.
    pub title: String,
    /// Secondary text.
    pub message: String,
    /// Row background color.
    pub background_color: String,
    /// Text color.
    pub font_color: String,
    /// Icon of the option type.
    pub icon: Icon,
    /// Custom icon reference, if configured.
    pub image: Option<String>,
}

impl From<&ContactOption> for OptionRow {
    fn from(option: &ContactOption) -> Self {
        Self {
            id: option.id.clone(),
            title: option.title.clone(),
            message: option.message.clone(),
            background_color: option.background_color.clone(),
            font_color: option.font_color.clone(),
            icon: match option.kind {
                OptionType::Whatsapp => Icon::WhatsApp,
                _ => Icon::Phone,
            },
            image: option.image.clone(),
        }
    }
}

/// The call-back form as drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    /// Heading.
    pub prompt: &'static str,
    /// Name as typed.
    pub name: String,
    /// Phone as typed.
    pub phone: String,
    /// Whether the submit control is enabled.
    pub can_submit: bool,
    /// Whether a submission is in flight.
    pub submitting: bool,
    /// Server answer being displayed.
    pub message: Option<String>,
}

/// Body of the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    /// Option rows in display order.
    Options(Vec<OptionRow>),
    /// The call-back form.
    Form(FormView),
}

/// The open modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    /// Panel placement.
    pub style: StyleMap,
    /// Header title.
    pub header_title: String,
    /// Header subtitle.
    pub header_subtitle: String,
    /// Header background.
    pub header_style: StyleMap,
    /// Body.
    pub content: PanelView,
}

/// The floating trigger button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerView {
    /// Button placement and color.
    pub style: StyleMap,
    /// Tooltip.
    pub title: String,
    /// [`Icon::Close`] while the modal is open.
    pub icon: Icon,
}

/// Everything needed to draw the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    /// The trigger button.
    pub trigger: TriggerView,
    /// The modal, when open.
    pub modal: Option<ModalView>,
}

/// State of the storefront contact widget.
pub struct WidgetSession {
    api: PublicApi,
    account: String,
    guard: MountGuard,
    opener: Arc<dyn LinkOpener>,
    widget: Option<Widget>,
    modal_open: bool,
    panel: Panel,
    selected: Option<OptionId>,
    form: CallbackForm,
}

impl std::fmt::Debug for WidgetSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetSession")
            .field("account", &self.account)
            .field("visible", &self.is_visible())
            .field("modal_open", &self.modal_open)
            .field("panel", &self.panel)
            .finish_non_exhaustive()
    }
}

impl WidgetSession {
    /// Creates an unmounted, hidden session.
    #[must_use]
    pub fn new(api: PublicApi, account: impl Into<String>) -> Self {
        Self {
            api,
            account: account.into(),
            guard: MountGuard::new(),
            opener: Arc::new(SystemOpener),
            widget: None,
            modal_open: false,
            panel: Panel::Options,
            selected: None,
            form: CallbackForm::new(),
        }
    }

    /// Replaces the link opener.
    #[must_use]
    pub fn with_opener(mut self, opener: Arc<dyn LinkOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Returns a handle the owner can use to tear the session down.
    #[must_use]
    pub fn guard(&self) -> MountGuard {
        self.guard.clone()
    }

    /// Fetches the widget.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TornDown`] if the guard was torn down before
    /// the response arrived; the response is then discarded.
    #[instrument(skip(self), fields(account = %self.account))]
    pub async fn mount(&mut self) -> Result<()> {
        self.guard.check()?;
        let result = self.api.widget(&self.account).await;
        self.guard.check()?;

        if !result.success {
            warn!(message = %result.message, "widget fetch failed");
        }
        self.widget = result.into_data().and_then(|w| w.into_displayable());
        info!(visible = self.widget.is_some(), "widget mounted");
        Ok(())
    }

    /// Returns whether the widget is drawn at all.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.widget.is_some()
    }

    /// Returns the displayed widget.
    #[must_use]
    pub const fn widget(&self) -> Option<&Widget> {
        self.widget.as_ref()
    }

    /// Returns whether the modal is open.
    #[must_use]
    pub const fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Returns what the modal body shows.
    #[must_use]
    pub const fn panel(&self) -> Panel {
        self.panel
    }

    /// Returns the call-back form.
    #[must_use]
    pub const fn form(&self) -> &CallbackForm {
        &self.form
    }

    /// Returns the call-back form for input.
    pub fn form_mut(&mut self) -> &mut CallbackForm {
        &mut self.form
    }

    fn displayed(&self) -> Result<&Widget> {
        self.widget.as_ref().ok_or(RenderError::Hidden)
    }

    /// Opens or closes the modal and returns whether it is now open.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Hidden`] if the widget is not displayed.
    pub fn toggle_modal(&mut self) -> Result<bool> {
        self.displayed()?;
        self.modal_open = !self.modal_open;
        Ok(self.modal_open)
    }

    /// Acts on the visitor picking an option.
    ///
    /// WhatsApp options open their conversation link right away.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::OptionNotFound`] if no displayed option has
    /// `id`, and an opener error if the link cannot be opened.
    #[instrument(skip(self))]
    pub fn select_option(&mut self, id: &OptionId) -> Result<OptionAction> {
        let option = self
            .displayed()?
            .active_options()
            .find(|o| &o.id == id)
            .ok_or_else(|| RenderError::OptionNotFound { id: id.clone() })?;

        let action = match &option.kind {
            OptionType::Whatsapp => OptionAction::OpenLink(whatsapp_option_link(option)),
            OptionType::Virfon => OptionAction::ShowCallbackForm,
            OptionType::Chat => OptionAction::OpenChat,
            other => OptionAction::Unsupported(other.clone()),
        };

        match &action {
            OptionAction::OpenLink(url) => self.opener.open(url)?,
            OptionAction::ShowCallbackForm => {
                self.panel = Panel::CallbackForm;
                self.selected = Some(id.clone());
            }
            OptionAction::OpenChat | OptionAction::Unsupported(_) => {}
        }
        debug!(?action, "option selected");
        Ok(action)
    }

    /// Closes the modal and clicks the third-party chat button.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Hidden`] if the widget is not displayed, and
    /// the adapter's error if the chat button never appears.
    pub async fn launch_chat<D: HostDocument>(
        &mut self,
        adapter: &EmbedAdapter<D>,
        selector: &str,
        policy: RetryPolicy,
    ) -> Result<()> {
        self.displayed()?;
        self.modal_open = false;
        adapter.open_chat(selector, policy).await
    }

    /// Leaves the call-back form and clears it.
    pub fn cancel_form(&mut self) {
        self.panel = Panel::Options;
        self.selected = None;
        self.form.reset();
    }

    /// Submits the call-back form and returns the message now displayed.
    ///
    /// Failures reported by the server are displayed the same way as
    /// successes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::FormNotReady`] if no call-back option is
    /// selected or the form cannot be submitted, and
    /// [`RenderError::TornDown`] if the session was torn down while the
    /// request was in flight.
    #[instrument(skip(self), fields(account = %self.account))]
    pub async fn submit_callback(&mut self) -> Result<String> {
        let option = self.selected.clone().ok_or(RenderError::FormNotReady {
            reason: "no call-back option is selected",
        })?;
        let request = self.form.begin_submit(option)?;

        let result = self.api.call_me_back(&self.account, &request).await;
        self.guard.check()?;

        if !result.success {
            warn!(message = %result.message, "call-back submission failed");
        }
        let message = result
            .data
            .map(|d| d.message)
            .filter(|m| !m.is_empty())
            .unwrap_or(result.message);

        self.form.finish_submit(message.clone(), Instant::now());
        Ok(message)
    }

    /// Clears an expired call-back answer. Returns `true` if it was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.form.tick(now)
    }

    /// Waits until the displayed call-back answer expires, then clears it.
    ///
    /// Returns immediately if no answer is displayed.
    pub async fn expire_message(&mut self) {
        if let Some(deadline) = self.form.message_deadline() {
            sleep_until(deadline).await;
            self.tick(Instant::now());
        }
    }

    /// Describes what to draw for a viewport `viewport_width` pixels wide.
    ///
    /// Returns `None` while the widget is hidden.
    #[must_use]
    pub fn view(&self, viewport_width: u32) -> Option<WidgetView> {
        let widget = self.widget.as_ref()?;

        let trigger = TriggerView {
            style: resolve_button_style(Some(widget), viewport_width),
            title: widget.button_title.clone(),
            icon: if self.modal_open { Icon::Close } else { Icon::WhatsApp },
        };

        let modal = self.modal_open.then(|| {
            let mut header_style = StyleMap::new();
            header_style.set("background-color", widget.header_color.as_str());

            let content = match self.panel {
                Panel::Options => {
                    PanelView::Options(widget.active_options().map(OptionRow::from).collect())
                }
                Panel::CallbackForm => PanelView::Form(FormView {
                    prompt: FORM_PROMPT,
                    name: self.form.name().to_string(),
                    phone: self.form.phone().to_string(),
                    can_submit: self.form.can_submit(),
                    submitting: matches!(
                        self.form.status(),
                        crate::callback::FormStatus::Submitting
                    ),
                    message: self.form.message().map(str::to_string),
                }),
            };

            ModalView {
                style: resolve_modal_style(Some(widget), viewport_width),
                header_title: widget.header_title.clone(),
                header_subtitle: widget.header_subtitle.clone(),
                header_style,
                content,
            }
        });

        Some(WidgetView { trigger, modal })
    }
}

/// State of the storefront WhatsApp help button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonSession {
    status: Option<ScheduleStatus>,
}

impl ButtonSession {
    /// Asks the backend whether the button is within opening hours.
    ///
    /// Any failure hides the button. No call is made without an account.
    #[instrument(skip(api))]
    pub async fn check(api: &PublicApi, account: &str) -> Self {
        if account.is_empty() {
            return Self::default();
        }

        let result = api.active_schedule_status(account).await;
        if !result.success {
            warn!(message = %result.message, "could not check WhatsApp availability");
        }
        let status = result.into_data().filter(|s| s.active);
        debug!(visible = status.is_some(), "WhatsApp button checked");
        Self { status }
    }

    /// Returns whether the button is drawn.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.status.is_some()
    }

    /// Returns the button label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        HELP_LABEL
    }

    /// Returns the link that asks for help with `product_url`, if visible.
    #[must_use]
    pub fn product_help_link(&self, product_url: &str) -> Option<String> {
        self.status
            .as_ref()
            .map(|s| product_help_link(&s.mobile_phone, product_url))
    }

    /// Opens the help link. Returns `false` if the button is hidden.
    ///
    /// # Errors
    ///
    /// Returns an opener error if the link cannot be opened.
    pub fn open_help(&self, product_url: &str, opener: &dyn LinkOpener) -> Result<bool> {
        match self.product_help_link(product_url) {
            Some(url) => {
                opener.open(&url)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
