//! Shared protocol types for the wawidget crates.
//!
//! This crate defines the widget configuration model exchanged with the
//! backend, together with the pure editors that produce replacement values
//! for it.
//!
//! # Overview
//!
//! - [`widget`]: The [`Widget`] aggregate and single-field updates
//! - [`option`] and [`option_list`]: Contact options and the ordered list editor
//! - [`position`]: Anchor rules for desktop and mobile placement
//! - [`schedule`]: Opening hours and the day editor
//! - [`button`]: The simple WhatsApp button aggregate
//! - [`color`], [`lookup`], [`callback`]: Supporting values
//! - [`error`]: Error types for editing operations
//!
//! # Examples
//!
//! Editing a widget's options through whole-value replacement:
//!
//! ```
//! use wawidget_protocol::dummy::dummy_widget;
//! use wawidget_protocol::{OptionId, WidgetField};
//!
//! let widget = dummy_widget();
//!
//! let options = widget.options.clone_option(&OptionId::Numeric(1))?;
//! let widget = widget.with_field(WidgetField::Options(options));
//!
//! assert_eq!(widget.options.len(), 4);
//! # Ok::<(), wawidget_protocol::ProtocolError>(())
//! ```

pub mod button;
pub mod callback;
pub mod color;
pub mod dummy;
pub mod error;
mod lenient;
pub mod lookup;
pub mod option;
pub mod option_list;
pub mod position;
pub mod schedule;
pub mod widget;

// Re-export primary types at crate root for convenience
pub use button::{ButtonField, ScheduleStatus, WhatsAppButton};
pub use callback::{CallMeBackRequest, CallMeBackResponse};
pub use color::{Color, Hsva, Rgba};
pub use error::{ProtocolError, Result};
pub use lookup::{LookupEntry, LookupKey, SelectOption, TimeZone, type_label};
pub use option::{ContactOption, OptionId, OptionType};
pub use option_list::OptionList;
pub use position::{Anchor, Device, MOBILE_BREAKPOINT_PX, Position, PositionDetails, PositionEdit, Unit};
pub use schedule::{Schedule, TimeOfDay, update_day, validate_schedules};
pub use widget::{FieldKind, PublicWidget, Widget, WidgetField};
