//! Error types for protocol operations.

use crate::option::OptionId;

/// Errors that can occur while editing widget values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// No option with the given identity exists in the list.
    #[error("option {id} not found")]
    OptionNotFound {
        /// The identity that was looked up.
        id: OptionId,
    },

    /// A list index was outside the list bounds.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The list length at the time of the call.
        len: usize,
    },

    /// No schedule entry with the given identity exists.
    #[error("schedule {id} not found")]
    ScheduleNotFound {
        /// The schedule identity that was looked up.
        id: i64,
    },

    /// Two schedule entries share the same identity.
    #[error("duplicate schedule entry {id}")]
    DuplicateSchedule {
        /// The repeated identity.
        id: i64,
    },

    /// A time-of-day string could not be parsed.
    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
