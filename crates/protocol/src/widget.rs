//! The widget aggregate.
//!
//! [`Widget`] is an immutable-style value: edits go through
//! [`Widget::with_field`], which replaces exactly one top-level attribute and
//! returns a new aggregate.

use serde::{Deserialize, Serialize};

use crate::option::ContactOption;
use crate::option_list::OptionList;
use crate::position::Position;
use crate::schedule::Schedule;

/// Persisted configuration of the floating contact widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Backend identity.
    pub id: i64,
    /// Time zone used to evaluate schedules.
    #[serde(default)]
    pub time_zone_id: i64,
    /// Tooltip of the trigger button.
    #[serde(default)]
    pub button_title: String,
    /// Modal header title.
    #[serde(default)]
    pub header_title: String,
    /// Modal header subtitle.
    #[serde(default)]
    pub header_subtitle: String,
    /// Trigger button background, as hex.
    #[serde(default)]
    pub button_color: String,
    /// Modal header background, as hex.
    #[serde(default)]
    pub header_color: String,
    /// Placement rules.
    #[serde(default)]
    pub position: Position,
    /// Contact options, in display order.
    #[serde(default)]
    pub options: OptionList,
    /// Opening hours, if the widget has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedules: Option<Vec<Schedule>>,
}

/// Names a top-level [`Widget`] attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// [`Widget::time_zone_id`].
    TimeZoneId,
    /// [`Widget::button_title`].
    ButtonTitle,
    /// [`Widget::header_title`].
    HeaderTitle,
    /// [`Widget::header_subtitle`].
    HeaderSubtitle,
    /// [`Widget::button_color`].
    ButtonColor,
    /// [`Widget::header_color`].
    HeaderColor,
    /// [`Widget::position`].
    Position,
    /// [`Widget::options`].
    Options,
    /// [`Widget::schedules`].
    Schedules,
}

impl FieldKind {
    /// Every field kind.
    pub const ALL: [Self; 9] = [
        Self::TimeZoneId,
        Self::ButtonTitle,
        Self::HeaderTitle,
        Self::HeaderSubtitle,
        Self::ButtonColor,
        Self::HeaderColor,
        Self::Position,
        Self::Options,
        Self::Schedules,
    ];
}

/// A new value for one top-level [`Widget`] attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetField {
    /// New time zone.
    TimeZoneId(i64),
    /// New trigger tooltip.
    ButtonTitle(String),
    /// New header title.
    HeaderTitle(String),
    /// New header subtitle.
    HeaderSubtitle(String),
    /// New trigger color.
    ButtonColor(String),
    /// New header color.
    HeaderColor(String),
    /// New placement rules.
    Position(Position),
    /// New option list.
    Options(OptionList),
    /// New opening hours.
    Schedules(Option<Vec<Schedule>>),
}

impl WidgetField {
    /// Returns which attribute this value belongs to.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::TimeZoneId(_) => FieldKind::TimeZoneId,
            Self::ButtonTitle(_) => FieldKind::ButtonTitle,
            Self::HeaderTitle(_) => FieldKind::HeaderTitle,
            Self::HeaderSubtitle(_) => FieldKind::HeaderSubtitle,
            Self::ButtonColor(_) => FieldKind::ButtonColor,
            Self::HeaderColor(_) => FieldKind::HeaderColor,
            Self::Position(_) => FieldKind::Position,
            Self::Options(_) => FieldKind::Options,
            Self::Schedules(_) => FieldKind::Schedules,
        }
    }
}

impl Widget {
    /// Returns a new widget with one attribute replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use wawidget_protocol::{FieldKind, Widget, WidgetField};
    ///
    /// let widget = Widget::default();
    /// let edited = widget.with_field(WidgetField::HeaderTitle("¿Hablamos?".into()));
    ///
    /// assert_eq!(edited.field(FieldKind::HeaderTitle), WidgetField::HeaderTitle("¿Hablamos?".into()));
    /// assert_eq!(edited.button_title, widget.button_title);
    /// ```
    #[must_use]
    pub fn with_field(&self, field: WidgetField) -> Self {
        let mut next = self.clone();
        match field {
            WidgetField::TimeZoneId(v) => next.time_zone_id = v,
            WidgetField::ButtonTitle(v) => next.button_title = v,
            WidgetField::HeaderTitle(v) => next.header_title = v,
            WidgetField::HeaderSubtitle(v) => next.header_subtitle = v,
            WidgetField::ButtonColor(v) => next.button_color = v,
            WidgetField::HeaderColor(v) => next.header_color = v,
            WidgetField::Position(v) => next.position = v,
            WidgetField::Options(v) => next.options = v,
            WidgetField::Schedules(v) => next.schedules = v,
        }
        next
    }

    /// Reads one attribute as a [`WidgetField`].
    #[must_use]
    pub fn field(&self, kind: FieldKind) -> WidgetField {
        match kind {
            FieldKind::TimeZoneId => WidgetField::TimeZoneId(self.time_zone_id),
            FieldKind::ButtonTitle => WidgetField::ButtonTitle(self.button_title.clone()),
            FieldKind::HeaderTitle => WidgetField::HeaderTitle(self.header_title.clone()),
            FieldKind::HeaderSubtitle => WidgetField::HeaderSubtitle(self.header_subtitle.clone()),
            FieldKind::ButtonColor => WidgetField::ButtonColor(self.button_color.clone()),
            FieldKind::HeaderColor => WidgetField::HeaderColor(self.header_color.clone()),
            FieldKind::Position => WidgetField::Position(self.position.clone()),
            FieldKind::Options => WidgetField::Options(self.options.clone()),
            FieldKind::Schedules => WidgetField::Schedules(self.schedules.clone()),
        }
    }

    /// Returns the options visitors can pick, in display order.
    pub fn active_options(&self) -> impl Iterator<Item = &ContactOption> {
        self.options.iter().filter(|o| o.active)
    }
}

/// Response of the public widget endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicWidget {
    /// The widget, if the account has one.
    #[serde(default)]
    pub widget: Option<Widget>,
    /// Whether the widget is enabled for the storefront.
    #[serde(default)]
    pub active: bool,
}

impl PublicWidget {
    /// Returns the widget if it should be shown at all.
    ///
    /// An inactive widget, a missing widget, or a widget with no active
    /// options is suppressed entirely.
    #[must_use]
    pub fn into_displayable(self) -> Option<Widget> {
        if !self.active {
            return None;
        }
        self.widget.filter(|w| w.active_options().next().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::dummy_widget;

    #[test]
    fn deserialize_minimal_widget() {
        let widget: Widget = serde_json::from_str(r#"{"id": 4}"#).unwrap();
        assert_eq!(widget.id, 4);
        assert!(widget.options.is_empty());
        assert!(widget.schedules.is_none());
    }

    #[test]
    fn schedules_omitted_when_absent() {
        let json = serde_json::to_value(Widget::default()).unwrap();
        assert!(json.get("schedules").is_none());
    }

    #[test]
    fn public_widget_inactive_is_hidden() {
        let response = PublicWidget {
            widget: Some(dummy_widget()),
            active: false,
        };
        assert!(response.into_displayable().is_none());
    }

    #[test]
    fn public_widget_without_options_is_hidden() {
        let widget = Widget {
            options: OptionList::new(),
            ..dummy_widget()
        };
        let response = PublicWidget {
            widget: Some(widget),
            active: true,
        };
        assert!(response.into_displayable().is_none());
    }

    #[test]
    fn public_widget_with_only_inactive_options_is_hidden() {
        let mut options = dummy_widget().options.into_vec();
        for option in &mut options {
            option.active = false;
        }
        let response = PublicWidget {
            widget: Some(Widget {
                options: options.into(),
                ..dummy_widget()
            }),
            active: true,
        };
        assert!(response.into_displayable().is_none());
    }

    #[test]
    fn public_widget_active_is_shown() {
        let response: PublicWidget =
            serde_json::from_value(serde_json::json!({"active": true, "widget": dummy_widget()}))
                .unwrap();
        assert!(response.into_displayable().is_some());
    }

    #[test]
    fn active_options_skips_inactive() {
        let mut options = dummy_widget().options.into_vec();
        options[0].active = false;
        let widget = Widget {
            options: options.into(),
            ..dummy_widget()
        };
        assert_eq!(widget.active_options().count(), widget.options.len() - 1);
    }
}
