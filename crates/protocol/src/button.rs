//! The simple single-number WhatsApp button.

use serde::{Deserialize, Serialize};

use crate::schedule::Schedule;

/// Persisted configuration of the WhatsApp help button.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppButton {
    /// Backend identity.
    pub id: i64,
    /// Number conversations are opened with.
    #[serde(default)]
    pub mobile_phone: String,
    /// Opening hours.
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

/// A new value for one [`WhatsAppButton`] attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonField {
    /// New WhatsApp number.
    MobilePhone(String),
    /// New opening hours.
    Schedules(Vec<Schedule>),
}

impl WhatsAppButton {
    /// Returns a new button with one attribute replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use wawidget_protocol::{ButtonField, WhatsAppButton};
    ///
    /// let button = WhatsAppButton::default();
    /// let edited = button.with_field(ButtonField::MobilePhone("573001234567".into()));
    /// assert_eq!(edited.mobile_phone, "573001234567");
    /// ```
    #[must_use]
    pub fn with_field(&self, field: ButtonField) -> Self {
        let mut next = self.clone();
        match field {
            ButtonField::MobilePhone(v) => next.mobile_phone = v,
            ButtonField::Schedules(v) => next.schedules = v,
        }
        next
    }
}

/// Response of the public schedule status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStatus {
    /// Number to open conversations with.
    #[serde(default)]
    pub mobile_phone: String,
    /// Whether the current time falls inside an open schedule.
    #[serde(default)]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_field_keeps_other_attributes() {
        let button = WhatsAppButton {
            id: 2,
            mobile_phone: "3001234567".into(),
            schedules: vec![],
        };
        let edited = button.with_field(ButtonField::Schedules(vec![]));
        assert_eq!(edited, button);
    }

    #[test]
    fn schedule_status_defaults_to_inactive() {
        let status: ScheduleStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.active);
        assert!(status.mobile_phone.is_empty());
    }
}
