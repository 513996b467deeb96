//! The call-back form: validation and submission state.
//!
//! A visitor leaves a name and a Colombian mobile number. The number is
//! reduced to its digits and must be either a 10-digit `3xxxxxxxxx` number
//! or the same number with the `57` country code. After the server answers,
//! its message is shown for [`MESSAGE_DISPLAY`] and then the form resets.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tokio::time::Instant;
use wawidget_protocol::{CallMeBackRequest, OptionId};

use crate::error::{RenderError, Result};

/// Minimum number of characters in a name.
pub const MIN_NAME_LEN: usize = 3;

/// How long the server's answer stays on screen.
pub const MESSAGE_DISPLAY: Duration = Duration::from_secs(5);

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(573\d{9}|3\d{9})$").expect("valid regex"));

/// Strips every non-digit character.
///
/// # Examples
///
/// ```
/// use wawidget_render::callback::normalize_phone;
///
/// assert_eq!(normalize_phone("+57 (300) 123-4567"), "573001234567");
/// ```
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Returns whether `name` is long enough.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_LEN
}

/// Returns whether `raw`, once normalized, is a Colombian mobile number.
///
/// # Examples
///
/// ```
/// use wawidget_render::callback::is_valid_phone;
///
/// assert!(is_valid_phone("3001234567"));
/// assert!(is_valid_phone("+573001234567"));
/// assert!(!is_valid_phone("123"));
/// assert!(!is_valid_phone("300123456"));
/// ```
#[must_use]
pub fn is_valid_phone(raw: &str) -> bool {
    PHONE_PATTERN.is_match(&normalize_phone(raw))
}

/// Returns whether both fields are valid.
#[must_use]
pub fn validate(name: &str, phone: &str) -> bool {
    is_valid_name(name) && is_valid_phone(phone)
}

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    /// Accepting input.
    #[default]
    Editing,
    /// A submission is in flight.
    Submitting,
    /// Showing the server's answer until `until`.
    Answered {
        /// Text returned by the server.
        message: String,
        /// When the form resets.
        until: Instant,
    },
}

/// State of the call-back form.
///
/// # Examples
///
/// ```
/// use wawidget_protocol::OptionId;
/// use wawidget_render::CallbackForm;
///
/// let mut form = CallbackForm::new();
/// form.set_name("Ana");
/// form.set_phone("300 123 4567");
/// assert!(form.can_submit());
///
/// let request = form.begin_submit(OptionId::Numeric(2)).unwrap();
/// assert_eq!(request.number, "3001234567");
/// assert!(!form.can_submit());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackForm {
    name: String,
    phone: String,
    status: FormStatus,
}

impl CallbackForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the name as typed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the phone as typed.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the submit status.
    #[must_use]
    pub const fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Replaces the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the phone.
    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
    }

    /// Returns whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.status == FormStatus::Editing && validate(&self.name, &self.phone)
    }

    /// Returns the server's answer while it is displayed.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Answered { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns when the displayed answer expires.
    #[must_use]
    pub const fn message_deadline(&self) -> Option<Instant> {
        match &self.status {
            FormStatus::Answered { until, .. } => Some(*until),
            _ => None,
        }
    }

    /// Marks a submission as in flight and returns its body.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::FormNotReady`] if a submission is already in
    /// flight, an answer is displayed, or a field is invalid.
    pub fn begin_submit(&mut self, option: OptionId) -> Result<CallMeBackRequest> {
        match self.status {
            FormStatus::Submitting => {
                return Err(RenderError::FormNotReady {
                    reason: "a submission is in flight",
                });
            }
            FormStatus::Answered { .. } => {
                return Err(RenderError::FormNotReady {
                    reason: "an answer is displayed",
                });
            }
            FormStatus::Editing => {}
        }
        if !validate(&self.name, &self.phone) {
            return Err(RenderError::FormNotReady {
                reason: "name or phone is invalid",
            });
        }

        self.status = FormStatus::Submitting;
        Ok(CallMeBackRequest {
            number: normalize_phone(&self.phone),
            id: option,
        })
    }

    /// Records the server's answer, shown until `now + MESSAGE_DISPLAY`.
    pub fn finish_submit(&mut self, message: impl Into<String>, now: Instant) {
        self.status = FormStatus::Answered {
            message: message.into(),
            until: now + MESSAGE_DISPLAY,
        };
    }

    /// Resets the form once the displayed answer has expired.
    ///
    /// Returns `true` if the form was reset.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.message_deadline() {
            Some(until) if now >= until => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Clears both fields and the status.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_examples() {
        assert!(is_valid_phone("3001234567"));
        assert!(is_valid_phone("+573001234567"));
        assert!(!is_valid_phone("123"));
        assert!(!is_valid_phone("300123456"));
    }

    #[test]
    fn phone_rejects_wrong_prefixes_and_lengths() {
        assert!(!is_valid_phone("2001234567"));
        assert!(!is_valid_phone("583001234567"));
        assert!(!is_valid_phone("30012345678"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn name_needs_three_characters() {
        assert!(!is_valid_name("Al"));
        assert!(is_valid_name("Ana"));
        assert!(is_valid_name("Íñi"));
    }

    #[test]
    fn invalid_form_cannot_submit() {
        let mut form = CallbackForm::new();
        form.set_name("Al");
        form.set_phone("3001234567");
        assert!(!form.can_submit());
        assert!(matches!(
            form.begin_submit(OptionId::Numeric(1)),
            Err(RenderError::FormNotReady { .. })
        ));
        assert_eq!(form.status(), &FormStatus::Editing);
    }

    #[test]
    fn second_submit_is_blocked_while_in_flight() {
        let mut form = CallbackForm::new();
        form.set_name("Ana");
        form.set_phone("3001234567");

        form.begin_submit(OptionId::Numeric(1)).unwrap();
        assert!(form.begin_submit(OptionId::Numeric(1)).is_err());
    }

    #[test]
    fn answer_expires_after_display_time() {
        let mut form = CallbackForm::new();
        form.set_name("Ana");
        form.set_phone("3001234567");
        form.begin_submit(OptionId::Numeric(1)).unwrap();

        let now = Instant::now();
        form.finish_submit("Te llamaremos", now);
        assert_eq!(form.message(), Some("Te llamaremos"));

        assert!(!form.tick(now + Duration::from_millis(4_999)));
        assert_eq!(form.message(), Some("Te llamaremos"));

        assert!(form.tick(now + MESSAGE_DISPLAY));
        assert_eq!(form, CallbackForm::new());
    }
}
