//! Contact option types.
//!
//! A [`ContactOption`] is one row in the widget's modal: a WhatsApp deep
//! link, a call-back form, or an external chat launcher.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a contact option.
///
/// Options persisted by the backend carry numeric identities. Options
/// created in the editor (cloned or appended) carry a generated string
/// identity until the backend assigns a numeric one on save.
///
/// # Examples
///
/// ```
/// use wawidget_protocol::OptionId;
///
/// let id: OptionId = serde_json::from_str("12").unwrap();
/// assert_eq!(id, OptionId::Numeric(12));
///
/// let id: OptionId = serde_json::from_str(r#""tmp-1""#).unwrap();
/// assert!(id.is_generated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionId {
    /// An identity assigned by the backend.
    Numeric(i64),
    /// An identity generated by the editor for a not-yet-saved option.
    Generated(String),
}

impl OptionId {
    /// Returns `true` if this identity was generated client-side.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Generated(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for OptionId {
    /// Parses numeric text as a backend identity, anything else as generated.
    fn from(value: &str) -> Self {
        value
            .parse::<i64>()
            .map_or_else(|_| Self::Generated(value.to_string()), Self::Numeric)
    }
}

/// What selecting an option does.
///
/// The set is open: unknown backend values are kept verbatim in
/// [`OptionType::Other`] so they survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OptionType {
    /// Opens a WhatsApp conversation through a deep link.
    #[default]
    Whatsapp,
    /// Shows the call-back form.
    Virfon,
    /// Opens the third-party chat embed.
    Chat,
    /// Any other type the backend knows about.
    Other(String),
}

impl OptionType {
    /// Returns the wire name of this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Whatsapp => "whatsapp",
            Self::Virfon => "virfon",
            Self::Chat => "chat",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for OptionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "whatsapp" => Self::Whatsapp,
            "virfon" => Self::Virfon,
            "chat" => Self::Chat,
            _ => Self::Other(value),
        }
    }
}

impl From<OptionType> for String {
    fn from(value: OptionType) -> Self {
        match value {
            OptionType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable contact method inside the widget modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactOption {
    /// Identity of this option.
    pub id: OptionId,
    /// Zero-based position in the persisted list.
    #[serde(default)]
    pub order: usize,
    /// Heading shown on the option row.
    #[serde(default)]
    pub title: String,
    /// Secondary text shown on the option row.
    #[serde(default)]
    pub message: String,
    /// What selecting the option does.
    #[serde(rename = "type", default)]
    pub kind: OptionType,
    /// WhatsApp number, for `whatsapp` options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    /// Message pre-filled in the WhatsApp conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined_message: Option<String>,
    /// Call-back queue, for `virfon` options.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::lenient::opt_i64_from_number_or_text"
    )]
    pub queue: Option<i64>,
    /// Row background color, as a hex string.
    #[serde(default)]
    pub background_color: String,
    /// Row text color, as a hex string.
    #[serde(default)]
    pub font_color: String,
    /// Optional icon reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the option is offered to visitors.
    #[serde(default)]
    pub active: bool,
}

impl ContactOption {
    /// Creates an active option with the given identity, title and type.
    ///
    /// Colors default to white text on the WhatsApp green.
    ///
    /// # Examples
    ///
    /// ```
    /// use wawidget_protocol::{ContactOption, OptionId, OptionType};
    ///
    /// let option = ContactOption::new(OptionId::Numeric(1), "Sales", OptionType::Whatsapp);
    /// assert!(option.active);
    /// assert_eq!(option.order, 0);
    /// ```
    #[must_use]
    pub fn new(id: OptionId, title: impl Into<String>, kind: OptionType) -> Self {
        Self {
            id,
            order: 0,
            title: title.into(),
            message: String::new(),
            kind,
            mobile_phone: None,
            predefined_message: None,
            queue: None,
            background_color: "#25d366".to_string(),
            font_color: "#ffffff".to_string(),
            image: None,
            active: true,
        }
    }

    /// Returns `true` if both options are equal apart from `id` and `order`.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.title == other.title
            && self.message == other.message
            && self.kind == other.kind
            && self.mobile_phone == other.mobile_phone
            && self.predefined_message == other.predefined_message
            && self.queue == other.queue
            && self.background_color == other.background_color
            && self.font_color == other.font_color
            && self.image == other.image
            && self.active == other.active
    }
}
