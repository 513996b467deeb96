//! Error types for storefront rendering.

use wawidget_protocol::OptionId;

/// Errors that can occur while driving the storefront widget.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The session was torn down before a pending result arrived.
    #[error("session was torn down")]
    TornDown,

    /// The widget is hidden, so it cannot be interacted with.
    #[error("widget is not displayed")]
    Hidden,

    /// No displayed option has the given identity.
    #[error("option not found: {id}")]
    OptionNotFound {
        /// The identity that was looked up.
        id: OptionId,
    },

    /// The call-back form cannot be submitted in its current state.
    #[error("call-back form is not ready: {reason}")]
    FormNotReady {
        /// Why submission is blocked.
        reason: &'static str,
    },

    /// An element of the host page did not appear in time.
    #[error("element {selector:?} not found after {attempts} attempts")]
    ElementNotFound {
        /// The selector that was probed.
        selector: String,
        /// How many probes were made.
        attempts: u32,
    },

    /// The embed adapter was already torn down.
    #[error("embed adapter was torn down")]
    EmbedTornDown,

    /// A link could not be opened.
    #[error("failed to open link: {0}")]
    Open(#[from] std::io::Error),
}

/// A specialized Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_element_not_found() {
        let err = RenderError::ElementNotFound {
            selector: "#chat-button".to_string(),
            attempts: 20,
        };
        assert_eq!(
            err.to_string(),
            "element \"#chat-button\" not found after 20 attempts"
        );
    }

    #[test]
    fn error_display_option_not_found() {
        let err = RenderError::OptionNotFound {
            id: OptionId::Numeric(9),
        };
        assert_eq!(err.to_string(), "option not found: 9");
    }
}
