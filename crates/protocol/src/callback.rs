//! Call-back request and response bodies.

use serde::{Deserialize, Serialize};

use crate::option::OptionId;

/// Body of the call-me-back submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMeBackRequest {
    /// Digits-only phone number of the visitor.
    pub number: String,
    /// The `virfon` option the visitor picked.
    pub id: OptionId,
}

/// Response of the call-me-back submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMeBackResponse {
    /// Text to show the visitor.
    #[serde(default)]
    pub message: String,
}
