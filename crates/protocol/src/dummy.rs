//! Dummy data generation for testing and demonstration.
//!
//! # Examples
//!
//! ```
//! use wawidget_protocol::dummy::dummy_widget;
//!
//! let widget = dummy_widget();
//! assert_eq!(widget.options.len(), 3);
//! ```

use chrono::NaiveTime;

use crate::option::{ContactOption, OptionId, OptionType};
use crate::option_list::OptionList;
use crate::position::{Anchor, Position, PositionDetails, Unit};
use crate::schedule::{Schedule, TimeOfDay};
use crate::widget::Widget;

/// Internal helper to cut boilerplate when building sample options.
struct OptionBuilder {
    option: ContactOption,
}

impl OptionBuilder {
    fn new(id: i64, title: &str, kind: OptionType) -> Self {
        Self {
            option: ContactOption::new(OptionId::Numeric(id), title, kind),
        }
    }

    fn message(mut self, message: &str) -> Self {
        self.option.message = message.to_string();
        self
    }

    fn phone(mut self, phone: &str, predefined: &str) -> Self {
        self.option.mobile_phone = Some(phone.to_string());
        self.option.predefined_message = Some(predefined.to_string());
        self
    }

    fn queue(mut self, queue: i64) -> Self {
        self.option.queue = Some(queue);
        self
    }

    fn build(self) -> ContactOption {
        self.option
    }
}

fn detail(anchor: Anchor, unit: Unit, value: f64, active: bool) -> PositionDetails {
    PositionDetails {
        anchor,
        unit,
        value,
        active,
    }
}

fn hour(h: u32) -> TimeOfDay {
    TimeOfDay::from(NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default())
}

fn day(id: i64, name: &str, active: bool) -> Schedule {
    Schedule {
        id,
        day_name: name.to_string(),
        start_time: hour(8),
        end_time: hour(18),
        active,
    }
}

/// Generates a sample position: bottom-right on desktop, bottom-left on mobile.
#[must_use]
pub fn dummy_position() -> Position {
    Position {
        id: 1,
        desktop: vec![
            detail(Anchor::Top, Unit::Pixel, 0.0, false),
            detail(Anchor::Bottom, Unit::Pixel, 20.0, true),
            detail(Anchor::Left, Unit::Pixel, 0.0, false),
            detail(Anchor::Right, Unit::Percentage, 2.0, true),
        ],
        mobile: vec![
            detail(Anchor::Top, Unit::Pixel, 0.0, false),
            detail(Anchor::Bottom, Unit::Pixel, 10.0, true),
            detail(Anchor::Left, Unit::Pixel, 10.0, true),
            detail(Anchor::Right, Unit::Pixel, 0.0, false),
        ],
    }
}

/// Generates a sample widget with one option of each built-in type and a
/// Monday-to-Saturday schedule.
#[must_use]
pub fn dummy_widget() -> Widget {
    let options = vec![
        OptionBuilder::new(1, "Ventas", OptionType::Whatsapp)
            .message("Asesoría para tu compra")
            .phone("573001234567", "Hola, quiero comprar")
            .build(),
        OptionBuilder::new(2, "Te llamamos", OptionType::Virfon)
            .message("Déjanos tu número")
            .queue(301)
            .build(),
        OptionBuilder::new(3, "Chat", OptionType::Chat)
            .message("Habla con un agente")
            .build(),
    ];

    let schedules = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado"]
        .iter()
        .enumerate()
        .map(|(i, name)| day(i as i64 + 1, name, true))
        .chain(std::iter::once(day(7, "Domingo", false)))
        .collect();

    Widget {
        id: 1,
        time_zone_id: 7,
        button_title: "Contáctanos".to_string(),
        header_title: "¿En qué podemos ayudarte?".to_string(),
        header_subtitle: "Elige un canal".to_string(),
        button_color: "#25d366".to_string(),
        header_color: "#075e54".to_string(),
        position: dummy_position(),
        options: OptionList::from(options),
        schedules: Some(schedules),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::validate_schedules;

    #[test]
    fn dummy_widget_is_consistent() {
        let widget = dummy_widget();
        for (index, option) in widget.options.iter().enumerate() {
            assert_eq!(option.order, index);
        }
        let schedules = widget.schedules.expect("dummy has schedules");
        assert_eq!(schedules.len(), 7);
        assert!(validate_schedules(&schedules).is_ok());
    }
}
