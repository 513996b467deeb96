//! The widget editor: lookups, selection and every edit an admin can make.
//!
//! [`AdminEditor`] never mutates the widget itself. Each edit builds the new
//! value of one top-level attribute and hands it to the [`WidgetStore`].

use tracing::{debug, instrument, warn};
use wawidget_client::{AdminApi, ApiResult};
use wawidget_protocol::{
    Anchor, Color, ContactOption, Device, LookupKey, OptionId, OptionType, PositionEdit,
    ProtocolError, Schedule, SelectOption, TimeZone, Widget, WidgetField, update_day,
};

use crate::error::{AdminError, Result};
use crate::store::WidgetStore;

/// Picker contents loaded alongside the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookups {
    /// Time zones for the schedule.
    pub time_zones: Vec<SelectOption<TimeZone>>,
    /// Option types.
    pub type_widgets: Vec<SelectOption<LookupKey>>,
    /// Value types.
    pub type_values: Vec<SelectOption<LookupKey>>,
}

/// Which color an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTarget {
    /// Trigger button.
    Button,
    /// Modal header.
    Header,
    /// Background of the selected option.
    OptionBackground,
    /// Text of the selected option.
    OptionFont,
}

/// A color picked during this editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorChange {
    /// What was recolored.
    pub target: ColorTarget,
    /// The picked color; only its hex form is persisted.
    pub color: Color,
}

/// Edits one account's widget.
#[derive(Debug)]
pub struct AdminEditor {
    api: AdminApi,
    store: WidgetStore,
    lookups: Lookups,
    selected: Option<OptionId>,
    time_zone: Option<TimeZone>,
    colors: Vec<ColorChange>,
}

fn lookup_or_empty<T>(name: &str, result: ApiResult<Vec<T>>) -> Vec<T> {
    if !result.success {
        warn!(lookup = name, message = %result.message, "lookup failed");
    }
    result.into_data().unwrap_or_default()
}

impl AdminEditor {
    /// Creates an editor for `account`. Nothing is fetched until
    /// [`load`](Self::load).
    #[must_use]
    pub fn new(api: AdminApi, account: impl Into<String>) -> Self {
        Self {
            store: WidgetStore::new(api.clone(), account),
            api,
            lookups: Lookups::default(),
            selected: None,
            time_zone: None,
            colors: Vec::new(),
        }
    }

    /// Fetches the lookups and the widget.
    ///
    /// A failed lookup leaves its picker empty. The first option is
    /// selected.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Load`] if the widget could not be fetched.
    #[instrument(skip(self), fields(account = %self.store.account()))]
    pub async fn load(&mut self) -> Result<&Widget> {
        let (time_zones, type_widgets, type_values) = tokio::join!(
            self.api.time_zones(),
            self.api.type_widgets(),
            self.api.type_values(),
        );
        self.lookups = Lookups {
            time_zones: lookup_or_empty("time-zones", time_zones),
            type_widgets: lookup_or_empty("type-widgets", type_widgets),
            type_values: lookup_or_empty("type-values", type_values),
        };

        self.store.load().await?;
        self.sync_selection();
        debug!(selected = ?self.selected, "editor loaded");
        self.widget()
    }

    /// Returns the widget being edited.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotLoaded`] before a successful load.
    pub fn widget(&self) -> Result<&Widget> {
        self.store.current().ok_or(AdminError::NotLoaded)
    }

    /// Returns the picker contents.
    #[must_use]
    pub const fn lookups(&self) -> &Lookups {
        &self.lookups
    }

    /// Returns the banner message of the last failed load or save.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.store.error()
    }

    /// Returns the colors picked so far, oldest first.
    #[must_use]
    pub fn color_history(&self) -> &[ColorChange] {
        &self.colors
    }

    /// Returns the time zone matching the widget, if it is in the lookups.
    #[must_use]
    pub const fn time_zone(&self) -> Option<&TimeZone> {
        self.time_zone.as_ref()
    }

    /// Returns the option whose details are being edited.
    #[must_use]
    pub fn selected_option(&self) -> Option<&ContactOption> {
        let id = self.selected.as_ref()?;
        self.store.current()?.options.get(id)
    }

    /// Selects the option whose details are edited next.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::OptionNotFound`] if no option has `id`.
    pub fn select_option(&mut self, id: &OptionId) -> Result<()> {
        let widget = self.widget()?;
        if widget.options.get(id).is_none() {
            return Err(ProtocolError::OptionNotFound { id: id.clone() }.into());
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Replaces a text or color attribute.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotLoaded`] before a successful load.
    pub fn set_field(&mut self, field: WidgetField) -> Result<&Widget> {
        self.store.set_field(field)
    }

    /// Applies a picked color. Only the hex form is stored in the widget.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidColor`] for a malformed hex string,
    /// and [`AdminError::NoOptionSelected`] for an option color without a
    /// selection.
    pub fn set_color(&mut self, target: ColorTarget, hex: &str) -> Result<&Widget> {
        let color = Color::from_hex(hex)?;
        let value = color.hex.clone();

        match target {
            ColorTarget::Button => self.store.set_field(WidgetField::ButtonColor(value))?,
            ColorTarget::Header => self.store.set_field(WidgetField::HeaderColor(value))?,
            ColorTarget::OptionBackground => {
                self.edit_option(|o| o.background_color = value)?
            }
            ColorTarget::OptionFont => self.edit_option(|o| o.font_color = value)?,
        };

        self.colors.push(ColorChange { target, color });
        self.widget()
    }

    /// Edits one anchor rule of the placement.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotLoaded`] before a successful load.
    pub fn edit_position(
        &mut self,
        device: Device,
        anchor: Anchor,
        edit: PositionEdit,
    ) -> Result<&Widget> {
        let position = self.widget()?.position.with_detail(device, anchor, edit);
        self.store.set_field(WidgetField::Position(position))
    }

    /// Edits the selected option in place.
    ///
    /// The option keeps its identity whatever `edit` does to it.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NoOptionSelected`] without a selection.
    pub fn edit_option(&mut self, edit: impl FnOnce(&mut ContactOption)) -> Result<&Widget> {
        let widget = self.widget()?;
        let id = self.selected.as_ref().ok_or(AdminError::NoOptionSelected)?;
        let mut option = widget
            .options
            .get(id)
            .cloned()
            .ok_or_else(|| ProtocolError::OptionNotFound { id: id.clone() })?;

        edit(&mut option);
        option.id = id.clone();

        let options = widget.options.replace(option)?;
        self.store.set_field(WidgetField::Options(options))
    }

    /// Changes the selected option's type from its wire name.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NoOptionSelected`] without a selection.
    pub fn set_option_type(&mut self, wire_name: &str) -> Result<&Widget> {
        let kind = OptionType::from(wire_name.to_string());
        self.edit_option(|o| o.kind = kind)
    }

    /// Appends a copy of an option under a fresh identity.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::OptionNotFound`] if no option has `id`.
    pub fn clone_option(&mut self, id: &OptionId) -> Result<&Widget> {
        let options = self.widget()?.options.clone_option(id)?;
        self.store.set_field(WidgetField::Options(options))
    }

    /// Removes an option. Removing the selected option selects the first
    /// remaining one.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::OptionNotFound`] if no option has `id`.
    pub fn delete_option(&mut self, id: &OptionId) -> Result<&Widget> {
        let options = self.widget()?.options.delete(id)?;
        self.store.set_field(WidgetField::Options(options))?;
        self.sync_selection();
        self.widget()
    }

    /// Moves the option at `from` to index `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::IndexOutOfRange`] for an index outside the
    /// list.
    pub fn reorder_options(&mut self, from: usize, to: usize) -> Result<&Widget> {
        let options = self.widget()?.options.reorder(from, to)?;
        self.store.set_field(WidgetField::Options(options))
    }

    /// Appends a new option and selects it. Returns its identity.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotLoaded`] before a successful load.
    pub fn append_option(&mut self, title: &str, kind: OptionType) -> Result<OptionId> {
        let widget = self.widget()?;
        let id = widget.options.generate_id();
        let options = widget
            .options
            .append(ContactOption::new(id.clone(), title, kind));

        self.store.set_field(WidgetField::Options(options))?;
        self.selected = Some(id.clone());
        Ok(id)
    }

    /// Replaces one day of the opening hours.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::ScheduleNotFound`] if the widget has no day
    /// with that identity.
    pub fn update_schedule(&mut self, day: Schedule) -> Result<&Widget> {
        let schedules = self.widget()?.schedules.as_deref().unwrap_or_default();
        let updated = update_day(schedules, day)?;
        self.store.set_field(WidgetField::Schedules(Some(updated)))
    }

    /// Picks the widget's time zone from the lookup list.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::UnknownTimeZone`] if the lookups have no zone
    /// with `id`.
    pub fn select_time_zone(&mut self, id: i64) -> Result<&Widget> {
        let zone = self
            .lookups
            .time_zones
            .iter()
            .find(|z| z.value.id == id)
            .map(|z| z.value.clone())
            .ok_or(AdminError::UnknownTimeZone { id })?;

        self.time_zone = Some(zone);
        self.store.set_field(WidgetField::TimeZoneId(id))
    }

    /// Saves the widget and adopts the server's copy.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Save`] if the backend rejected the widget; the
    /// message is also kept as the banner.
    pub async fn save(&mut self) -> Result<&Widget> {
        self.store.save().await?;
        self.sync_selection();
        self.widget()
    }

    /// Keeps the selection and time zone pointing at things that exist.
    fn sync_selection(&mut self) {
        let Some(widget) = self.store.current() else {
            return;
        };

        let still_there = self
            .selected
            .as_ref()
            .is_some_and(|id| widget.options.get(id).is_some());
        if !still_there {
            self.selected = widget.options.iter().next().map(|o| o.id.clone());
        }

        self.time_zone = self
            .lookups
            .time_zones
            .iter()
            .find(|z| z.value.id == widget.time_zone_id)
            .map(|z| z.value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tempfile::TempDir;
    use wawidget_client::{
        ApiClient, Auth, PlatformIdentity, SessionResolver, SessionTokenCache, TOKEN_HEADER,
    };
    use wawidget_protocol::dummy::dummy_widget;
    use wawidget_protocol::{TimeOfDay, Unit};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn editor(server: &MockServer, dir: &TempDir) -> AdminEditor {
        Mock::given(method("GET"))
            .and(path("/api/vtexid/pub/authenticated/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userId": "tok-1",
                "user": "admin@tienda.co",
                "userType": "admin"
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/time-zones"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": 7, "name": "Bogotá", "identifier": "America/Bogota"},
                    {"id": 8, "name": "Lima", "identifier": "America/Lima"}
                ]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/type-widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "whatsapp", "name": "WhatsApp"}, {"id": "virfon", "name": "Te llamamos"}]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/type-values"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "caído"})))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/whats-app-widget/mitienda/admin"))
            .and(header(TOKEN_HEADER, "tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": dummy_widget()})))
            .mount(server)
            .await;

        let timeout = Duration::from_secs(5);
        let identity =
            PlatformIdentity::new(&server.uri(), "/api/vtexid/pub/authenticated/user", timeout)
                .unwrap();
        let cache = SessionTokenCache::new(dir.path().join("session.json"));
        let resolver = SessionResolver::new(Arc::new(identity), cache, Duration::from_secs(86_400));
        let client = ApiClient::new(server.uri(), timeout, Auth::Session(Arc::new(resolver))).unwrap();

        let mut editor = AdminEditor::new(AdminApi::new(client), "mitienda");
        editor.load().await.unwrap();
        editor
    }

    #[tokio::test]
    async fn load_fills_lookups_and_selection() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let editor = editor(&server, &dir).await;

        assert_eq!(editor.lookups().time_zones.len(), 2);
        assert_eq!(editor.lookups().type_widgets[1].label, "Te llamamos");
        assert!(editor.lookups().type_values.is_empty());
        assert_eq!(editor.time_zone().map(|z| z.name.as_str()), Some("Bogotá"));
        assert_eq!(editor.selected_option().unwrap().id, OptionId::Numeric(1));
    }

    #[tokio::test]
    async fn option_color_edits_selected_option() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let mut editor = editor(&server, &dir).await;

        editor.select_option(&OptionId::Numeric(2)).unwrap();
        editor.set_color(ColorTarget::OptionFont, "#ABC").unwrap();

        let widget = editor.widget().unwrap();
        assert_eq!(widget.options.get(&OptionId::Numeric(2)).unwrap().font_color, "#aabbcc");
        assert_eq!(widget.options.get(&OptionId::Numeric(1)).unwrap().font_color, "#ffffff");
        assert_eq!(editor.color_history().len(), 1);
        assert_eq!(editor.color_history()[0].target, ColorTarget::OptionFont);
    }

    #[tokio::test]
    async fn invalid_color_changes_nothing() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let mut editor = editor(&server, &dir).await;
        let before = editor.widget().unwrap().clone();

        let err = editor.set_color(ColorTarget::Button, "verde").unwrap_err();
        assert!(matches!(err, AdminError::Protocol(ProtocolError::InvalidColor(_))));
        assert_eq!(editor.widget().unwrap(), &before);
        assert!(editor.color_history().is_empty());
    }

    #[tokio::test]
    async fn option_edit_keeps_identity() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let mut editor = editor(&server, &dir).await;

        editor
            .edit_option(|o| {
                o.id = OptionId::Numeric(99);
                o.title = "Compras".into();
            })
            .unwrap();

        let option = editor.selected_option().unwrap();
        assert_eq!(option.id, OptionId::Numeric(1));
        assert_eq!(option.title, "Compras");
    }

    #[tokio::test]
    async fn deleting_selected_option_selects_first() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let mut editor = editor(&server, &dir).await;

        editor.select_option(&OptionId::Numeric(1)).unwrap();
        editor.delete_option(&OptionId::Numeric(1)).unwrap();

        assert_eq!(editor.widget().unwrap().options.len(), 2);
        assert_eq!(editor.selected_option().unwrap().id, OptionId::Numeric(2));
    }

    #[tokio::test]
    async fn append_selects_new_option() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let mut editor = editor(&server, &dir).await;

        let id = editor.append_option("Soporte", OptionType::Chat).unwrap();
        assert!(id.is_generated());
        let option = editor.selected_option().unwrap();
        assert_eq!(option.title, "Soporte");
        assert_eq!(option.order, 3);
    }

    #[tokio::test]
    async fn position_and_schedule_edits() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let mut editor = editor(&server, &dir).await;

        editor
            .edit_position(Device::Desktop, Anchor::Bottom, PositionEdit::Unit(Unit::Percentage))
            .unwrap();
        let desktop = editor.widget().unwrap().position.desktop.clone();
        let bottom = desktop.iter().find(|d| d.anchor == Anchor::Bottom).unwrap();
        assert_eq!(bottom.unit, Unit::Percentage);

        let sunday = editor.widget().unwrap().schedules.as_ref().unwrap()[6].clone();
        let opened = sunday
            .toggled()
            .with_start_time(TimeOfDay::from_hms(9, 0, 0).unwrap());
        editor.update_schedule(opened).unwrap();
        let sunday = &editor.widget().unwrap().schedules.as_ref().unwrap()[6];
        assert!(sunday.active);
        assert_eq!(sunday.start_time, TimeOfDay::from_hms(9, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn time_zone_must_be_known() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let mut editor = editor(&server, &dir).await;

        assert!(matches!(
            editor.select_time_zone(42),
            Err(AdminError::UnknownTimeZone { id: 42 })
        ));
        assert_eq!(editor.select_time_zone(8).unwrap().time_zone_id, 8);
        assert_eq!(editor.time_zone().map(|z| z.name.as_str()), Some("Lima"));
    }

    #[tokio::test]
    async fn save_adopts_server_copy_and_clears_banner() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let mut editor = editor(&server, &dir).await;

        let mut stored = dummy_widget();
        stored.header_title = "Normalizado".into();
        Mock::given(method("PUT"))
            .and(path("/whats-app-widget/mitienda/admin/1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Título inválido"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/whats-app-widget/mitienda/admin/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Widget actualizado",
                "data": stored
            })))
            .mount(&server)
            .await;

        editor
            .set_field(WidgetField::HeaderTitle("  normalizado ".into()))
            .unwrap();
        assert!(matches!(editor.save().await, Err(AdminError::Save { .. })));
        assert_eq!(editor.error(), Some("Título inválido"));

        let saved = editor.save().await.unwrap();
        assert_eq!(saved.header_title, "Normalizado");
        assert!(editor.error().is_none());
    }
}
