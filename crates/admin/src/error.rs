//! Error types for admin editing.

use wawidget_protocol::ProtocolError;

/// Errors that can occur while loading, editing or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// An edit or save was attempted before anything was loaded.
    #[error("configuration has not been loaded")]
    NotLoaded,

    /// The backend did not return the configuration.
    #[error("could not load configuration: {message}")]
    Load {
        /// Message reported for the failed call.
        message: String,
    },

    /// The backend rejected a save.
    #[error("could not save configuration: {message}")]
    Save {
        /// Message reported for the failed call.
        message: String,
    },

    /// An option edit needs a selected option.
    #[error("no option is selected")]
    NoOptionSelected,

    /// The time zone is not in the loaded lookup list.
    #[error("unknown time zone: {id}")]
    UnknownTimeZone {
        /// The identity that was looked up.
        id: i64,
    },

    /// A value edit was rejected.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Result type for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;
    use wawidget_protocol::OptionId;

    #[test]
    fn protocol_errors_pass_through() {
        let err: AdminError = ProtocolError::OptionNotFound {
            id: OptionId::Numeric(4),
        }
        .into();
        assert_eq!(err.to_string(), "option 4 not found");
    }

    #[test]
    fn load_error_carries_message() {
        let err = AdminError::Load {
            message: "Cuenta no encontrada".into(),
        };
        assert_eq!(
            err.to_string(),
            "could not load configuration: Cuenta no encontrada"
        );
    }
}
