//! The uniform call outcome and the backend's response envelopes.
//!
//! Successful responses wrap their payload as `{ message?, data }`. Failed
//! responses carry a message in one of two shapes: `{ message }` from the
//! admin endpoints and `{ error: { message } }` from the public ones.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when a successful response carries none.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success";

/// Message used when a failure carries no readable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Outcome of one backend call.
///
/// Transport failures, non-2xx responses and undecodable payloads all end up
/// as `success == false` with `data == None`.
///
/// # Examples
///
/// ```
/// use wawidget_client::ApiResult;
///
/// let ok = ApiResult::ok("Guardado", Some(3));
/// assert!(ok.success);
/// assert_eq!(ok.map(|n| n * 2).data, Some(6));
///
/// let failed: ApiResult<i32> = ApiResult::failure("Sin conexión");
/// assert!(!failed.success);
/// assert!(failed.data.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    /// Whether the call succeeded.
    pub success: bool,
    /// Server message, or a fallback.
    pub message: String,
    /// Decoded payload. Always `None` on failure.
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    /// Creates a successful outcome.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Maps the payload, keeping success flag and message.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        ApiResult {
            success: self.success,
            message: self.message,
            data: self.data.map(f),
        }
    }

    /// Returns the payload of a successful call.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

/// Which failure envelope an endpoint family uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorShape {
    /// `{ "message": "..." }`
    Admin,
    /// `{ "error": { "message": "..." } }`
    Public,
}

impl ErrorShape {
    fn read(self, body: &Value) -> Option<&str> {
        let message = match self {
            Self::Admin => body.get("message"),
            Self::Public => body.get("error").and_then(|e| e.get("message")),
        };
        message.and_then(Value::as_str).filter(|m| !m.is_empty())
    }

    const fn other(self) -> Self {
        match self {
            Self::Admin => Self::Public,
            Self::Public => Self::Admin,
        }
    }
}

/// Pulls the failure message out of an error body.
///
/// `primary` is tried first, then the other shape, then
/// [`FALLBACK_ERROR_MESSAGE`].
///
/// # Examples
///
/// ```
/// use wawidget_client::envelope::{ErrorShape, error_message};
///
/// let public = r#"{"error": {"message": "Cuenta no encontrada"}}"#;
/// assert_eq!(error_message(public, ErrorShape::Public), "Cuenta no encontrada");
/// assert_eq!(error_message(public, ErrorShape::Admin), "Cuenta no encontrada");
/// assert_eq!(error_message("<html>", ErrorShape::Admin), "An unexpected error occurred");
/// ```
#[must_use]
pub fn error_message(body: &str, primary: ErrorShape) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return FALLBACK_ERROR_MESSAGE.to_string();
    };

    primary
        .read(&value)
        .or_else(|| primary.other().read(&value))
        .unwrap_or(FALLBACK_ERROR_MESSAGE)
        .to_string()
}

/// Successful response body.
#[derive(Debug, Deserialize)]
pub(crate) struct SuccessEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl SuccessEnvelope {
    pub(crate) fn message(&self) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_SUCCESS_MESSAGE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_shape_reads_top_level_message() {
        let body = r#"{"message": "Token inválido"}"#;
        assert_eq!(error_message(body, ErrorShape::Admin), "Token inválido");
    }

    #[test]
    fn admin_client_falls_back_to_public_shape() {
        let body = r#"{"error": {"message": "No autorizado"}}"#;
        assert_eq!(error_message(body, ErrorShape::Admin), "No autorizado");
    }

    #[test]
    fn primary_shape_wins_when_both_present() {
        let body = r#"{"message": "admin", "error": {"message": "public"}}"#;
        assert_eq!(error_message(body, ErrorShape::Admin), "admin");
        assert_eq!(error_message(body, ErrorShape::Public), "public");
    }

    #[test]
    fn empty_or_missing_message_uses_fallback() {
        for body in ["{}", r#"{"message": ""}"#, r#"{"error": "boom"}"#, ""] {
            assert_eq!(
                error_message(body, ErrorShape::Public),
                FALLBACK_ERROR_MESSAGE,
                "body {body:?}"
            );
        }
    }

    #[test]
    fn success_envelope_defaults_message() {
        let envelope: SuccessEnvelope = serde_json::from_str(r#"{"data": 1}"#).unwrap();
        assert_eq!(envelope.message(), DEFAULT_SUCCESS_MESSAGE);

        let envelope: SuccessEnvelope =
            serde_json::from_str(r#"{"message": "Guardado", "data": null}"#).unwrap();
        assert_eq!(envelope.message(), "Guardado");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn into_data_drops_payload_of_failure() {
        let result = ApiResult {
            success: false,
            message: "x".into(),
            data: Some(1),
        };
        assert!(result.into_data().is_none());
    }
}
