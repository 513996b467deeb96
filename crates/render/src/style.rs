//! Placement styles for the trigger button and the modal panel.
//!
//! Both resolvers are pure: the same widget and viewport width always give
//! the same [`StyleMap`]. Only active anchor rules of the device class that
//! matches the viewport contribute, and several anchors may be active at
//! once (for example `bottom` and `right`).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use wawidget_protocol::{Anchor, PositionDetails, Widget};

/// Space kept between the trigger button and the modal, in pixels.
pub const MODAL_CLEARANCE_PX: u32 = 50;

/// Extra vertical shift on narrow viewports when the modal sits above a
/// bottom-anchored button, leaving room for its close control.
pub const MOBILE_CLOSE_CLEARANCE_PX: u32 = 40;

const CENTERED: &str = "translate(-50%, -50%)";

/// CSS properties by name, kept in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<String, String>);

impl StyleMap {
    /// Creates an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing any previous value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.0.insert(property.into(), value.into());
    }

    /// Removes a property.
    pub fn remove(&mut self, property: &str) {
        self.0.remove(property);
    }

    /// Returns a property value.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    /// Returns whether the property is set.
    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.0.contains_key(property)
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(property, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

/// Formats as an inline `style` attribute: `a: b; c: d`.
impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{property}: {value}")?;
        }
        Ok(())
    }
}

fn active_rules(widget: &Widget, viewport_width: u32) -> impl Iterator<Item = &PositionDetails> {
    widget
        .position
        .for_viewport(viewport_width)
        .iter()
        .filter(|d| d.active)
}

fn with_clearance(length: &str) -> String {
    format!("calc({length} + {MODAL_CLEARANCE_PX}px)")
}

/// The default modal style: fixed, centered on screen, bounded width.
#[must_use]
pub fn default_modal_style() -> StyleMap {
    let mut style = StyleMap::new();
    style.set("position", "fixed");
    style.set("top", "50%");
    style.set("left", "50%");
    style.set("transform", CENTERED);
    style.set("-ms-transform", CENTERED);
    style.set("max-width", "calc(100% - 20px)");
    style.set("height", "fit-content");
    style
}

/// Resolves the trigger button style.
///
/// The button gets its background color plus one property per active
/// anchor. An absent widget yields an empty style.
///
/// # Examples
///
/// ```
/// use wawidget_protocol::dummy::dummy_widget;
/// use wawidget_render::resolve_button_style;
///
/// let style = resolve_button_style(Some(&dummy_widget()), 1280);
/// assert_eq!(style.get("bottom"), Some("20px"));
/// assert_eq!(style.get("right"), Some("2%"));
/// assert_eq!(style.get("background-color"), Some("#25d366"));
///
/// assert!(resolve_button_style(None, 1280).is_empty());
/// ```
#[must_use]
pub fn resolve_button_style(widget: Option<&Widget>, viewport_width: u32) -> StyleMap {
    let mut style = StyleMap::new();
    let Some(widget) = widget else {
        return style;
    };

    style.set("background-color", widget.button_color.as_str());
    for rule in active_rules(widget, viewport_width) {
        style.set(rule.anchor.as_str(), rule.css_length());
    }
    style
}

/// Resolves the modal panel style.
///
/// Starts from [`default_modal_style`]. On narrow viewports each active
/// `top`/`bottom` rule moves the panel clear of the button while keeping it
/// horizontally centered. On wide viewports the active rules replace the
/// centering entirely.
///
/// # Examples
///
/// ```
/// use wawidget_protocol::dummy::dummy_widget;
/// use wawidget_render::resolve_modal_style;
///
/// let widget = dummy_widget();
///
/// let desktop = resolve_modal_style(Some(&widget), 1280);
/// assert_eq!(desktop.get("bottom"), Some("calc(20px + 50px)"));
/// assert!(!desktop.contains("transform"));
///
/// let mobile = resolve_modal_style(Some(&widget), 375);
/// assert_eq!(mobile.get("bottom"), Some("calc(10px + 50px)"));
/// assert_eq!(mobile.get("transform"), Some("translate(-50%, calc(10px + 40px))"));
/// ```
#[must_use]
pub fn resolve_modal_style(widget: Option<&Widget>, viewport_width: u32) -> StyleMap {
    let mut style = default_modal_style();
    let Some(widget) = widget else {
        return style;
    };

    if viewport_width < wawidget_protocol::MOBILE_BREAKPOINT_PX {
        for rule in active_rules(widget, viewport_width).filter(|r| r.anchor.is_vertical()) {
            let length = rule.css_length();
            let shift = match rule.anchor {
                Anchor::Bottom => MOBILE_CLOSE_CLEARANCE_PX,
                _ => 0,
            };
            let transform = format!("translate(-50%, calc({length} + {shift}px))");

            style.set(rule.anchor.as_str(), with_clearance(&length));
            style.set("transform", transform.clone());
            style.set("-ms-transform", transform);
        }
        return style;
    }

    let mut anchors = StyleMap::new();
    for rule in active_rules(widget, viewport_width) {
        anchors.set(rule.anchor.as_str(), with_clearance(&rule.css_length()));
    }

    if !anchors.is_empty() {
        for property in ["transform", "-ms-transform", "top", "left"] {
            style.remove(property);
        }
    }
    style.merge(anchors);
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use wawidget_protocol::dummy::dummy_widget;
    use wawidget_protocol::{Position, Unit};

    fn widget_with(desktop: Vec<PositionDetails>, mobile: Vec<PositionDetails>) -> Widget {
        Widget {
            position: Position {
                id: 1,
                desktop,
                mobile,
            },
            ..dummy_widget()
        }
    }

    fn inactive(anchor: Anchor, value: f64) -> PositionDetails {
        PositionDetails {
            active: false,
            ..PositionDetails::new(anchor, Unit::Pixel, value)
        }
    }

    #[test]
    fn absent_widget_gives_bare_defaults() {
        assert!(resolve_button_style(None, 375).is_empty());
        assert_eq!(resolve_modal_style(None, 375), default_modal_style());
        assert_eq!(resolve_modal_style(None, 1280), default_modal_style());
    }

    #[test]
    fn no_active_anchor_keeps_centering() {
        let widget = widget_with(vec![inactive(Anchor::Bottom, 20.0)], vec![]);

        let button = resolve_button_style(Some(&widget), 1280);
        assert_eq!(button.len(), 1);
        assert!(button.contains("background-color"));

        assert_eq!(resolve_modal_style(Some(&widget), 1280), default_modal_style());
    }

    #[test]
    fn breakpoint_selects_rule_list() {
        let widget = widget_with(
            vec![PositionDetails::new(Anchor::Top, Unit::Pixel, 1.0)],
            vec![PositionDetails::new(Anchor::Top, Unit::Pixel, 2.0)],
        );
        assert_eq!(resolve_button_style(Some(&widget), 639).get("top"), Some("2px"));
        assert_eq!(resolve_button_style(Some(&widget), 640).get("top"), Some("1px"));
    }

    #[test]
    fn desktop_modal_uses_every_active_anchor() {
        let widget = widget_with(
            vec![
                PositionDetails::new(Anchor::Bottom, Unit::Pixel, 20.0),
                PositionDetails::new(Anchor::Right, Unit::Percentage, 2.0),
                inactive(Anchor::Top, 5.0),
            ],
            vec![],
        );

        let modal = resolve_modal_style(Some(&widget), 1024);
        assert_eq!(modal.get("bottom"), Some("calc(20px + 50px)"));
        assert_eq!(modal.get("right"), Some("calc(2% + 50px)"));
        for gone in ["top", "left", "transform", "-ms-transform"] {
            assert!(!modal.contains(gone), "{gone} should be dropped");
        }
        assert_eq!(modal.get("position"), Some("fixed"));
        assert_eq!(modal.get("max-width"), Some("calc(100% - 20px)"));
    }

    #[test]
    fn mobile_modal_top_anchor_has_no_extra_shift() {
        let widget = widget_with(
            vec![],
            vec![PositionDetails::new(Anchor::Top, Unit::Percentage, 5.0)],
        );

        let modal = resolve_modal_style(Some(&widget), 320);
        assert_eq!(modal.get("top"), Some("calc(5% + 50px)"));
        assert_eq!(modal.get("transform"), Some("translate(-50%, calc(5% + 0px))"));
        assert_eq!(modal.get("-ms-transform"), modal.get("transform"));
        assert_eq!(modal.get("left"), Some("50%"));
    }

    #[test]
    fn mobile_modal_ignores_horizontal_anchors() {
        let widget = widget_with(
            vec![],
            vec![PositionDetails::new(Anchor::Left, Unit::Pixel, 10.0)],
        );

        let modal = resolve_modal_style(Some(&widget), 320);
        assert_eq!(modal, default_modal_style());
        assert_eq!(resolve_button_style(Some(&widget), 320).get("left"), Some("10px"));
    }

    #[test]
    fn display_formats_inline_style() {
        let mut style = StyleMap::new();
        style.set("top", "1px");
        style.set("bottom", "2px");
        assert_eq!(style.to_string(), "bottom: 2px; top: 1px");
    }
}
