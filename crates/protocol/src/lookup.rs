//! Admin lookup tables and the picker entries built from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a lookup row; the backend uses both numbers and slugs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupKey {
    /// Numeric identity.
    Number(i64),
    /// Text identity.
    Text(String),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A generic `{id, name}` lookup row (type values and widget types).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    /// Row identity.
    pub id: LookupKey,
    /// Display name.
    pub name: String,
}

/// A time zone row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZone {
    /// Row identity, referenced by [`Widget::time_zone_id`](crate::Widget::time_zone_id).
    pub id: i64,
    /// Display name.
    pub name: String,
    /// IANA identifier, such as `America/Bogota`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Offset from UTC in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_hours: Option<String>,
    /// Country the zone belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    /// Offset label, such as `GMT-5`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_gmt: Option<String>,
}

/// One entry of a picker: the value handed back on selection and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption<V> {
    /// Value produced when the entry is picked.
    pub value: V,
    /// Text shown for the entry.
    pub label: String,
}

impl From<LookupEntry> for SelectOption<LookupKey> {
    fn from(entry: LookupEntry) -> Self {
        Self {
            value: entry.id,
            label: entry.name,
        }
    }
}

impl From<TimeZone> for SelectOption<TimeZone> {
    fn from(zone: TimeZone) -> Self {
        let label = zone.name.clone();
        Self { value: zone, label }
    }
}

/// Finds the label of a widget type in a picker list.
///
/// # Examples
///
/// ```
/// use wawidget_protocol::{LookupKey, SelectOption, type_label};
///
/// let types = vec![SelectOption { value: LookupKey::Text("whatsapp".into()), label: "WhatsApp".into() }];
/// assert_eq!(type_label(&types, "whatsapp"), Some("WhatsApp"));
/// assert_eq!(type_label(&types, "chat"), None);
/// ```
#[must_use]
pub fn type_label<'a>(types: &'a [SelectOption<LookupKey>], wire_name: &str) -> Option<&'a str> {
    types
        .iter()
        .find(|t| matches!(&t.value, LookupKey::Text(s) if s == wire_name))
        .map(|t| t.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_entry_to_select_option() {
        let entry: LookupEntry = serde_json::from_str(r#"{"id": 3, "name": "Texto"}"#).unwrap();
        let option = SelectOption::from(entry);
        assert_eq!(option.value, LookupKey::Number(3));
        assert_eq!(option.label, "Texto");
    }

    #[test]
    fn time_zone_select_option_keeps_row() {
        let zone: TimeZone =
            serde_json::from_str(r#"{"id": 7, "name": "Bogotá", "offset_gmt": "GMT-5"}"#).unwrap();
        let option = SelectOption::from(zone.clone());
        assert_eq!(option.label, "Bogotá");
        assert_eq!(option.value, zone);
    }
}
