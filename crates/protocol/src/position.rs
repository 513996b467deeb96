//! Placement rules for the trigger button and modal.
//!
//! A [`Position`] holds two independent lists of [`PositionDetails`], one
//! per [`Device`]. Each entry anchors the widget to one screen edge; only
//! active entries take part in layout, and any number of them may be
//! active at once.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Viewports narrower than this many CSS pixels use the mobile rules.
pub const MOBILE_BREAKPOINT_PX: u32 = 640;

/// A screen edge used as a placement reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// Distance from the top edge.
    Top,
    /// Distance from the bottom edge.
    Bottom,
    /// Distance from the left edge.
    Left,
    /// Distance from the right edge.
    Right,
}

impl Anchor {
    /// All anchors, in display order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// Returns the CSS property name for this anchor.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Returns `true` for the vertical anchors (`top` and `bottom`).
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a [`PositionDetails`] offset.
///
/// Anything the backend sends other than `"percentage"` is a pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    /// Percentage of the viewport dimension.
    Percentage,
    /// CSS pixels.
    #[default]
    Pixel,
}

impl Unit {
    /// Returns the CSS unit suffix.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Percentage => "%",
            Self::Pixel => "px",
        }
    }
}

impl From<String> for Unit {
    fn from(value: String) -> Self {
        if value == "percentage" {
            Self::Percentage
        } else {
            Self::Pixel
        }
    }
}

impl From<Unit> for String {
    fn from(value: Unit) -> Self {
        match value {
            Unit::Percentage => "percentage".to_string(),
            Unit::Pixel => "pixel".to_string(),
        }
    }
}

/// One anchor rule: edge, offset, unit and active flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionDetails {
    /// The screen edge this rule refers to.
    #[serde(rename = "position")]
    pub anchor: Anchor,
    /// Unit of `value`.
    #[serde(rename = "type", default)]
    pub unit: Unit,
    /// Offset from the edge.
    #[serde(default, deserialize_with = "crate::lenient::f64_from_number_or_text")]
    pub value: f64,
    /// Whether this rule contributes to layout.
    #[serde(default)]
    pub active: bool,
}

impl PositionDetails {
    /// Creates an active rule.
    #[must_use]
    pub const fn new(anchor: Anchor, unit: Unit, value: f64) -> Self {
        Self {
            anchor,
            unit,
            value,
            active: true,
        }
    }

    /// Returns the offset as a CSS length, such as `20px` or `5%`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wawidget_protocol::{Anchor, PositionDetails, Unit};
    ///
    /// assert_eq!(PositionDetails::new(Anchor::Bottom, Unit::Pixel, 20.0).css_length(), "20px");
    /// assert_eq!(PositionDetails::new(Anchor::Right, Unit::Percentage, 2.5).css_length(), "2.5%");
    /// ```
    #[must_use]
    pub fn css_length(&self) -> String {
        format!("{}{}", self.value, self.unit.suffix())
    }
}

/// Which rule list applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Viewports at least [`MOBILE_BREAKPOINT_PX`] wide.
    Desktop,
    /// Viewports narrower than [`MOBILE_BREAKPOINT_PX`].
    Mobile,
}

impl Device {
    /// Selects the device class for a viewport width.
    ///
    /// # Examples
    ///
    /// ```
    /// use wawidget_protocol::Device;
    ///
    /// assert_eq!(Device::for_viewport(639), Device::Mobile);
    /// assert_eq!(Device::for_viewport(640), Device::Desktop);
    /// ```
    #[must_use]
    pub const fn for_viewport(width: u32) -> Self {
        if width < MOBILE_BREAKPOINT_PX {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// An edit applied to one anchor rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionEdit {
    /// Set the offset.
    Value(f64),
    /// Set the unit.
    Unit(Unit),
    /// Flip the active flag.
    ToggleActive,
}

/// Desktop and mobile placement rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Backend identity.
    #[serde(default)]
    pub id: i64,
    /// Rules for wide viewports.
    #[serde(default)]
    pub desktop: Vec<PositionDetails>,
    /// Rules for narrow viewports.
    #[serde(default)]
    pub mobile: Vec<PositionDetails>,
}

impl Position {
    /// Returns the rule list for a device.
    #[must_use]
    pub fn details(&self, device: Device) -> &[PositionDetails] {
        match device {
            Device::Desktop => &self.desktop,
            Device::Mobile => &self.mobile,
        }
    }

    /// Returns the rule list that applies to a viewport width.
    #[must_use]
    pub fn for_viewport(&self, width: u32) -> &[PositionDetails] {
        self.details(Device::for_viewport(width))
    }

    /// Returns a copy with `edit` applied to every `anchor` rule of `device`.
    ///
    /// Rules for other anchors and for the other device are unchanged. If
    /// the device has no rule for `anchor`, the copy equals `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wawidget_protocol::{Anchor, Device, Position, PositionDetails, PositionEdit, Unit};
    ///
    /// let position = Position {
    ///     id: 1,
    ///     desktop: vec![PositionDetails::new(Anchor::Bottom, Unit::Pixel, 20.0)],
    ///     mobile: vec![],
    /// };
    ///
    /// let edited = position.with_detail(Device::Desktop, Anchor::Bottom, PositionEdit::Value(35.0));
    /// assert_eq!(edited.desktop[0].value, 35.0);
    /// assert_eq!(position.desktop[0].value, 20.0);
    /// ```
    #[must_use]
    pub fn with_detail(&self, device: Device, anchor: Anchor, edit: PositionEdit) -> Self {
        let mut next = self.clone();
        let list = match device {
            Device::Desktop => &mut next.desktop,
            Device::Mobile => &mut next.mobile,
        };

        for detail in list.iter_mut().filter(|d| d.anchor == anchor) {
            match edit {
                PositionEdit::Value(value) => detail.value = value,
                PositionEdit::Unit(unit) => detail.unit = unit,
                PositionEdit::ToggleActive => detail.active = !detail.active,
            }
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_backend_details() {
        let json = r#"[
            {"position": "bottom", "type": "pixel", "value": "20", "active": true},
            {"position": "right", "type": "percentage", "value": 5, "active": false},
            {"position": "top", "type": "px", "value": "", "active": false}
        ]"#;
        let details: Vec<PositionDetails> = serde_json::from_str(json).unwrap();

        assert_eq!(details[0].anchor, Anchor::Bottom);
        assert_eq!(details[0].unit, Unit::Pixel);
        assert_eq!(details[0].value, 20.0);
        assert!(details[0].active);

        assert_eq!(details[1].unit, Unit::Percentage);
        assert_eq!(details[1].value, 5.0);

        assert_eq!(details[2].unit, Unit::Pixel);
        assert_eq!(details[2].value, 0.0);
    }

    #[test]
    fn non_finite_offset_is_rejected() {
        let json = r#"{"position": "bottom", "type": "pixel", "value": "NaN", "active": true}"#;
        assert!(serde_json::from_str::<PositionDetails>(json).is_err());
    }

    #[test]
    fn css_length_formats_fractional_values() {
        let detail = PositionDetails::new(Anchor::Left, Unit::Pixel, 12.5);
        assert_eq!(detail.css_length(), "12.5px");
    }

    #[test]
    fn for_viewport_selects_list() {
        let position = Position {
            id: 1,
            desktop: vec![PositionDetails::new(Anchor::Right, Unit::Pixel, 10.0)],
            mobile: vec![PositionDetails::new(Anchor::Left, Unit::Pixel, 10.0)],
        };

        assert_eq!(position.for_viewport(1024)[0].anchor, Anchor::Right);
        assert_eq!(position.for_viewport(375)[0].anchor, Anchor::Left);
    }

    #[test]
    fn with_detail_toggles_only_target() {
        let position = Position {
            id: 1,
            desktop: vec![
                PositionDetails::new(Anchor::Bottom, Unit::Pixel, 20.0),
                PositionDetails::new(Anchor::Right, Unit::Pixel, 20.0),
            ],
            mobile: vec![PositionDetails::new(Anchor::Bottom, Unit::Pixel, 20.0)],
        };

        let edited = position.with_detail(Device::Desktop, Anchor::Right, PositionEdit::ToggleActive);
        assert!(edited.desktop[0].active);
        assert!(!edited.desktop[1].active);
        assert_eq!(edited.mobile, position.mobile);
    }

    #[test]
    fn with_detail_sets_unit() {
        let position = Position {
            id: 1,
            desktop: vec![],
            mobile: vec![PositionDetails::new(Anchor::Top, Unit::Pixel, 8.0)],
        };

        let edited =
            position.with_detail(Device::Mobile, Anchor::Top, PositionEdit::Unit(Unit::Percentage));
        assert_eq!(edited.mobile[0].unit, Unit::Percentage);
        assert_eq!(edited.mobile[0].css_length(), "8%");
    }

    #[test]
    fn unit_serializes_wire_names() {
        assert_eq!(serde_json::to_string(&Unit::Percentage).unwrap(), r#""percentage""#);
        assert_eq!(serde_json::to_string(&Unit::Pixel).unwrap(), r#""pixel""#);
    }
}
